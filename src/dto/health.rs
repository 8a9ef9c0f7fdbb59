//! Health check payload.

use serde::Serialize;
use utoipa::ToSchema;

/// Simple health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status ("ok" or "degraded").
    pub status: String,
    /// Viewer identifier currently mounted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewer_id: Option<String>,
}

impl HealthResponse {
    /// The mounted view is receiving live updates, or nothing is mounted.
    pub fn ok(viewer_id: Option<String>) -> Self {
        Self {
            status: "ok".to_string(),
            viewer_id,
        }
    }

    /// A view is mounted but its feed is gone; updates have stopped.
    pub fn degraded(viewer_id: Option<String>) -> Self {
        Self {
            status: "degraded".to_string(),
            viewer_id,
        }
    }
}
