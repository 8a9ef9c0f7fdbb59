//! Wire types for the backend REST contract that are not part of the live view model.

use serde::{Deserialize, Serialize};
use serde_with::{DefaultOnNull, serde_as};
use utoipa::ToSchema;
use validator::Validate;

use crate::state::board::CompetitionState;

/// One row of the public competition list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionRow {
    /// Viewer identifier of the competition.
    pub public_id: String,
    /// Competition title.
    pub name: String,
    /// ISO 8601 start time.
    pub start_time: String,
    /// Allotted duration in seconds.
    pub total_time: i64,
    /// Lifecycle state.
    pub state: CompetitionState,
}

/// One cursor-paginated page of the public competition list.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionListPage {
    /// Rows of this page.
    #[serde(default, alias = "scoreBoardRows")]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub rows: Vec<CompetitionRow>,
    /// Creation timestamp half of the next-page cursor.
    #[serde(default)]
    pub next_cursor_created_at: Option<String>,
    /// Identifier half of the next-page cursor.
    #[serde(default)]
    pub next_cursor_id: Option<String>,
}

impl CompetitionListPage {
    /// Cursor for the following page, if the backend returned both halves.
    pub fn next_cursor(&self) -> Option<ListCursor> {
        ListCursor::from_parts(
            self.next_cursor_created_at.clone(),
            self.next_cursor_id.clone(),
        )
    }
}

/// Position in the public competition list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCursor {
    /// Creation timestamp of the last row seen.
    pub created_at: String,
    /// Identifier of the last row seen.
    pub id: String,
}

impl ListCursor {
    /// Build a cursor only when both halves are present and non-empty.
    pub fn from_parts(created_at: Option<String>, id: Option<String>) -> Option<Self> {
        let created_at = created_at.filter(|value| !value.is_empty())?;
        let id = id.filter(|value| !value.is_empty())?;
        Some(Self { created_at, id })
    }
}

/// Competition owned by the signed-in administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManagedBoard {
    /// Internal competition identifier.
    pub competition_id: String,
    /// Manage identifier used to open the score workflow.
    pub manage_board_public_id: String,
    /// Competition title.
    pub competition_name: String,
}

/// Team as exposed by the manage-board detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManagedTeam {
    /// Team identifier.
    pub team_id: String,
    /// Display name.
    pub team_name: String,
    /// Current score.
    pub score_value: i64,
}

/// Authoritative detail behind a manage identifier.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManageDetail {
    /// Internal competition identifier used for score patches.
    pub competition_id: String,
    /// Competition title.
    pub competition_name: String,
    /// Owner identifier.
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub manager_id: String,
    /// Owner display name.
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub manager_name: String,
    /// Teams with their scores.
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub teams: Vec<ManagedTeam>,
}

/// Team reference inside the settings detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettingsTeam {
    /// Team identifier.
    pub team_id: String,
    /// Display name.
    pub name: String,
}

/// Competition settings as returned by `GET api/v1/competitions/{id}`.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionSettings {
    /// Internal competition identifier.
    pub competition_id: String,
    /// Competition title.
    pub name: String,
    /// Operator announcement.
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub announcement: String,
    /// Longer description.
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub description: String,
    /// ISO 8601 start time.
    pub start_time: String,
    /// Allotted duration in seconds.
    pub total_time: i64,
    /// Lifecycle state.
    pub state: CompetitionState,
    /// Configured teams.
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub teams: Vec<SettingsTeam>,
}

/// Team definition used when creating a competition.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewTeam {
    /// Display name.
    #[validate(length(min = 1))]
    pub name: String,
    /// Score the team starts with.
    #[serde(default)]
    pub initial_score: i64,
}

/// Body of `POST api/v1/competitions`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompetitionRequest {
    /// Competition title.
    #[validate(length(min = 1))]
    pub name: String,
    /// Operator announcement.
    #[serde(default)]
    pub announcement: String,
    /// Longer description.
    #[serde(default)]
    pub description: String,
    /// ISO 8601 start time.
    pub start_time: String,
    /// Allotted duration in seconds.
    pub total_time: i64,
    /// Listed in the public competition list.
    #[serde(default)]
    pub is_public: bool,
    /// Hosted outside the platform.
    #[serde(default)]
    pub is_external: bool,
    /// Initial teams.
    #[validate(nested)]
    pub team: Vec<NewTeam>,
    /// Optional vanity URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_url: Option<String>,
}

/// Team definition used when patching settings; new teams carry no identifier.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PatchTeam {
    /// Existing team identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    /// Display name.
    #[validate(length(min = 1))]
    pub name: String,
    /// Score the team starts with.
    #[serde(default)]
    pub initial_score: i64,
}

/// Body of `PATCH api/v1/competitions/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PatchCompetitionRequest {
    /// Competition title.
    #[validate(length(min = 1))]
    pub name: String,
    /// Operator announcement.
    #[serde(default)]
    pub announcement: String,
    /// Longer description.
    #[serde(default)]
    pub description: String,
    /// ISO 8601 start time.
    pub start_time: String,
    /// Allotted duration in seconds.
    pub total_time: i64,
    /// Full team list after the patch.
    #[validate(nested)]
    pub teams: Vec<PatchTeam>,
}

/// Lifecycle action posted to `api/v1/competitions/{id}/actions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StateAction {
    /// WAITING to RUNNING.
    Start,
    /// RUNNING to PAUSED.
    Pause,
    /// PAUSED to RUNNING.
    Resume,
    /// Anything to CLOSED.
    Close,
}

impl StateAction {
    /// Value of the `mode` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Close => "close",
        }
    }
}

/// Body of the team score patch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScorePatch {
    /// Signed adjustment.
    pub delta: i64,
    /// Free-text reason.
    pub reason: String,
    /// Always `NORMAL` from this client.
    pub event_type: String,
    /// Always `INCREASE` from this client; the sign lives in `delta`.
    pub policy_type: String,
}

impl ScorePatch {
    /// Patch with the fixed event and policy types used by manual adjustments.
    pub fn manual(delta: i64, reason: impl Into<String>) -> Self {
        Self {
            delta,
            reason: reason.into(),
            event_type: "NORMAL".into(),
            policy_type: "INCREASE".into(),
        }
    }
}

/// Credentials posted to `auth/sign-in`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct SignInRequest {
    /// Account email.
    #[validate(email)]
    pub email: String,
    /// Account password.
    #[validate(length(min = 1))]
    pub password: String,
}

/// Token pair returned by the backend on sign-in.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JwtToken {
    /// Bearer credential.
    pub access_token: String,
}

/// Response of `auth/sign-in`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    /// Issued tokens, when sign-in succeeded.
    #[serde(default)]
    pub jwt_token: Option<JwtToken>,
}
