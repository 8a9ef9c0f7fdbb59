//! DTO definitions used by the local admin and view-control REST API.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationErrors};

use crate::{
    dto::{
        competition::{ListCursor, StateAction},
        validation::validate_public_id,
    },
    state::manage::ManageSession,
};

/// Request to mount a viewer identifier on the relay.
#[derive(Debug, Deserialize, ToSchema)]
pub struct MountRequest {
    /// Public viewer identifier to follow.
    pub viewer_id: String,
}

impl Validate for MountRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Err(e) = validate_public_id(&self.viewer_id) {
            errors.add("viewer_id", e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Outcome of a mount request.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MountResponse {
    /// Viewer now mounted.
    pub viewer_id: String,
    /// The streaming feed accepted the connection. Without it the view only shows the bootstrap.
    pub feed_connected: bool,
}

/// Free-text reason attached to a pending adjustment.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReasonRequest {
    /// Replaces the current reason; may be empty.
    pub reason: String,
}

/// Team of the open manage board with its pending adjustment.
#[derive(Debug, Serialize, ToSchema)]
pub struct ManagedTeamView {
    /// Backend identifier of the team.
    pub team_id: String,
    /// Display name.
    pub team_name: String,
    /// Score as last read from the backend.
    pub score_value: i64,
    /// Adjustment not yet submitted.
    pub pending_delta: i64,
    /// Reason sent with the adjustment.
    pub pending_reason: String,
}

/// Open manage board as returned by the admin score routes.
#[derive(Debug, Serialize, ToSchema)]
pub struct ManageBoardView {
    /// Identifier the board was opened with.
    pub manage_id: String,
    /// Internal competition identifier.
    pub competition_id: String,
    /// Competition display name.
    pub competition_name: String,
    /// Owner of the competition.
    pub manager_name: String,
    /// Teams in backend order.
    pub teams: Vec<ManagedTeamView>,
}

impl From<&ManageSession> for ManageBoardView {
    fn from(session: &ManageSession) -> Self {
        let detail = &session.detail;
        let teams = detail
            .teams
            .iter()
            .map(|team| {
                let pending = session.pending(&team.team_id).cloned().unwrap_or_default();
                ManagedTeamView {
                    team_id: team.team_id.clone(),
                    team_name: team.team_name.clone(),
                    score_value: team.score_value,
                    pending_delta: pending.delta,
                    pending_reason: pending.reason,
                }
            })
            .collect();

        Self {
            manage_id: session.manage_id.clone(),
            competition_id: detail.competition_id.clone(),
            competition_name: detail.competition_name.clone(),
            manager_name: detail.manager_name.clone(),
            teams,
        }
    }
}

/// Query of the state action route.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ActionQuery {
    /// One of `start`, `pause`, `resume`, `close`.
    #[param(value_type = String)]
    pub mode: StateAction,
}

/// Query of the public competition list route.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Page size; the configured default applies when omitted.
    pub size: Option<u32>,
    /// Creation timestamp half of the cursor.
    pub cursor_created_at: Option<String>,
    /// Identifier half of the cursor.
    pub cursor_id: Option<String>,
}

impl ListQuery {
    /// Cursor for the requested page; the first page unless both halves are given.
    pub fn cursor(&self) -> Option<ListCursor> {
        ListCursor::from_parts(self.cursor_created_at.clone(), self.cursor_id.clone())
    }
}

/// Whether the relay currently holds a backend credential.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionStatus {
    /// A bearer token is held.
    pub signed_in: bool,
}
