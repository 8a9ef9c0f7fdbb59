//! Canonical scoreboard entities shared by the REST client, the feed decoder and the view.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_with::{DefaultOnNull, serde_as};
use utoipa::ToSchema;

/// Lifecycle state reported by the backend for a competition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompetitionState {
    /// Scheduled but not started yet.
    Waiting,
    /// Clock is running and scores are moving.
    Running,
    /// Temporarily halted by an administrator.
    Paused,
    /// Finished; scores are final.
    Closed,
    /// Any value this client does not know about.
    #[serde(other)]
    Unknown,
}

impl CompetitionState {
    /// Wire representation of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "WAITING",
            Self::Running => "RUNNING",
            Self::Paused => "PAUSED",
            Self::Closed => "CLOSED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for CompetitionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One participating team as known to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    /// Opaque identifier, stable across updates.
    pub team_id: String,
    /// Display name.
    pub name: String,
    /// Current score; unbounded and possibly negative.
    pub score: i64,
}

/// A single score adjustment recorded by the backend.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreChangeLog {
    /// Team whose score changed.
    pub team_name: String,
    /// Free-text opponent; not guaranteed to match a known team.
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub against_team_name: String,
    /// Signed adjustment.
    pub delta: i64,
    /// Free-text reason given by the administrator.
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub reason: String,
    /// ISO 8601 timestamp of the change.
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub changed_at: String,
}

/// Full snapshot of one competition.
///
/// The public snapshot endpoint and the `COMPETITION_DATA_CHANGE` feed payload share
/// this shape; older payloads name the title `competitionName`.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBoard {
    /// Competition title.
    #[serde(alias = "competitionName")]
    pub name: String,
    /// Operator announcement shown above the board.
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub announcement: String,
    /// Longer description.
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub description: String,
    /// Raw ISO 8601 start time; kept verbatim because it may not parse.
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub start_time: String,
    /// Total allotted duration in seconds.
    #[serde(default)]
    pub total_time: i64,
    /// Lifecycle state.
    pub state: CompetitionState,
    /// Teams in arrival order.
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub teams: Vec<Team>,
}

/// In-memory view model for one mounted scoreboard.
///
/// `teams` is the displayed team list. It starts as the board's own list and is then
/// replaced by every streamed message carrying teams.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveView {
    /// Latest known snapshot; `None` while loading.
    pub board: Option<ScoreBoard>,
    /// Team list currently displayed.
    pub teams: Vec<Team>,
    /// Score history in arrival order.
    pub history: Vec<ScoreChangeLog>,
    /// A full snapshot arrived over the feed; bootstrap results are stale from then on.
    pub snapshot_streamed: bool,
    /// The feed already delivered a team list.
    pub teams_streamed: bool,
}

impl LiveView {
    /// Whether the view still waits for its first snapshot.
    pub fn is_loading(&self) -> bool {
        self.board.is_none()
    }
}
