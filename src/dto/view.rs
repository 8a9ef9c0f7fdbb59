//! Presentation projection of the live view, recomputed on every read.

use serde::Serialize;
use time::OffsetDateTime;
use utoipa::ToSchema;

use crate::state::{
    board::{CompetitionState, LiveView, ScoreChangeLog},
    clock::{TimerReading, format_hms, rank_teams},
};

/// Team with its 1-based position on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RankedTeam {
    /// Position, starting at 1.
    pub rank: usize,
    /// Backend identifier of the team.
    pub team_id: String,
    /// Display name.
    pub name: String,
    /// Current score.
    pub score: i64,
}

/// Elapsed and remaining time, raw and formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TimerView {
    /// Seconds since the start, clamped to the total time.
    pub elapsed_seconds: i64,
    /// Seconds left, never negative.
    pub remaining_seconds: i64,
    /// `HH:MM:SS`.
    pub elapsed: String,
    /// `HH:MM:SS`.
    pub remaining: String,
    /// Remaining time is below the urgency threshold.
    pub urgent: bool,
}

impl From<TimerReading> for TimerView {
    fn from(reading: TimerReading) -> Self {
        Self {
            elapsed_seconds: reading.elapsed,
            remaining_seconds: reading.remaining,
            elapsed: format_hms(reading.elapsed),
            remaining: format_hms(reading.remaining),
            urgent: reading.urgent,
        }
    }
}

/// Scoreboard as served to local consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ScoreboardView {
    /// Viewer the board was fetched for.
    pub viewer_id: String,
    /// Competition name.
    pub name: String,
    /// Announcement text.
    pub announcement: String,
    /// Description text.
    pub description: String,
    /// Scheduled start as sent by the backend.
    pub start_time: String,
    /// Duration in seconds.
    pub total_time: i64,
    /// Lifecycle state.
    pub state: CompetitionState,
    /// Teams ordered by score, highest first.
    pub teams: Vec<RankedTeam>,
    /// Timer at projection time.
    pub timer: TimerView,
    /// Score history in arrival order.
    pub history: Vec<ScoreChangeLog>,
}

impl ScoreboardView {
    /// Project `view` at `now`. `None` while the view is still loading.
    pub fn project(
        viewer_id: &str,
        view: &LiveView,
        now: OffsetDateTime,
        urgent_threshold: i64,
    ) -> Option<Self> {
        let board = view.board.as_ref()?;
        let teams = rank_teams(&view.teams)
            .into_iter()
            .enumerate()
            .map(|(index, team)| RankedTeam {
                rank: index + 1,
                team_id: team.team_id,
                name: team.name,
                score: team.score,
            })
            .collect();

        Some(Self {
            viewer_id: viewer_id.to_string(),
            name: board.name.clone(),
            announcement: board.announcement.clone(),
            description: board.description.clone(),
            start_time: board.start_time.clone(),
            total_time: board.total_time,
            state: board.state,
            teams,
            timer: TimerReading::at(board, now, urgent_threshold).into(),
            history: view.history.clone(),
        })
    }
}

/// Mounted view as returned by `GET /public/view`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ViewResponse {
    /// Mounted viewer.
    pub viewer_id: String,
    /// No snapshot has arrived yet.
    pub loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Present once the view has loaded.
    pub scoreboard: Option<ScoreboardView>,
}

/// Timer-only payload pushed once per second on the public stream.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TimerTick {
    /// Mounted viewer.
    pub viewer_id: String,
    /// Lifecycle state.
    pub state: CompetitionState,
    /// Timer at tick time.
    pub timer: TimerView,
}

/// History of the mounted competition.
#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryResponse {
    /// Mounted viewer.
    pub viewer_id: String,
    /// Score history in arrival order.
    pub history: Vec<ScoreChangeLog>,
}
