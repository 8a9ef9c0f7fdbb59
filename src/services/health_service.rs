use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report whether the mounted view still receives live updates.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let viewer_id = state.read_view().await.viewer_id;
    if viewer_id.is_none() {
        return HealthResponse::ok(None);
    }

    if state.feed_active().await {
        HealthResponse::ok(viewer_id)
    } else {
        warn!(viewer_id = ?viewer_id, "live feed is not connected");
        HealthResponse::degraded(viewer_id)
    }
}
