//! Pure state transitions for the live view.
//!
//! Both functions take the previous [`LiveView`] by value and return the next one, so
//! they can be exercised without a connection or a runtime.

use crate::{
    dto::feed::FeedMessage,
    state::board::{LiveView, ScoreBoard, ScoreChangeLog},
};

/// Fold one feed message into the view.
pub fn apply(mut view: LiveView, message: FeedMessage) -> LiveView {
    match message {
        FeedMessage::FullSnapshot(payload) => LiveView {
            teams: payload.score_board.teams.clone(),
            board: Some(payload.score_board),
            history: payload.score_histories,
            snapshot_streamed: true,
            teams_streamed: true,
        },
        FeedMessage::ScoreDelta(payload) => {
            view.teams = payload.teams;
            view.history.extend(payload.score_histories);
            view.teams_streamed = true;
            view
        }
        FeedMessage::Keepalive | FeedMessage::Unrecognized { .. } => view,
    }
}

/// Install the bootstrap result, reconciling with anything the feed already delivered.
///
/// Once a full snapshot has been streamed the bootstrap result is ignored. Otherwise the
/// board is installed, a team list already streamed wins over the bootstrap one, and
/// streamed history entries stay after the bootstrap history.
pub fn apply_bootstrap(
    mut view: LiveView,
    board: ScoreBoard,
    history: Vec<ScoreChangeLog>,
) -> LiveView {
    if view.snapshot_streamed {
        return view;
    }

    if !view.teams_streamed {
        view.teams = board.teams.clone();
    }
    let streamed = std::mem::replace(&mut view.history, history);
    view.history.extend(streamed);
    view.board = Some(board);
    view
}
