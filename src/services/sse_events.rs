use std::time::Duration;

use serde::Serialize;
use time::OffsetDateTime;
use tokio::time::{MissedTickBehavior, interval};
use tracing::warn;

use crate::{
    dto::{
        sse::{ServerEvent, ViewMounted},
        view::{ScoreboardView, TimerTick},
    },
    state::{SharedState, clock::TimerReading},
};

const EVENT_VIEW_UPDATED: &str = "view.updated";
const EVENT_VIEW_TICK: &str = "view.tick";
const EVENT_VIEW_MOUNTED: &str = "view.mounted";

const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Broadcast the full projection of the mounted view, if it has loaded.
pub async fn broadcast_view(state: &SharedState) {
    let slot = state.read_view().await;
    let Some(viewer_id) = slot.viewer_id.as_deref() else {
        return;
    };
    let now = OffsetDateTime::now_utc();
    if let Some(projection) = ScoreboardView::project(
        viewer_id,
        &slot.view,
        now,
        state.config().urgent_threshold_secs,
    ) {
        send_public_event(state, EVENT_VIEW_UPDATED, &projection);
    }
}

/// Broadcast that the mounted viewer changed.
pub fn broadcast_view_mounted(state: &SharedState, viewer_id: Option<String>) {
    send_public_event(state, EVENT_VIEW_MOUNTED, &ViewMounted { viewer_id });
}

/// Push the derived timer once per second so displays count down without polling.
pub async fn run_timer_ticker(state: SharedState) {
    let mut ticker = interval(TICK_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        let slot = state.read_view().await;
        let (Some(viewer_id), Some(board)) = (slot.viewer_id, slot.view.board.as_ref()) else {
            continue;
        };
        let reading = TimerReading::at(
            board,
            OffsetDateTime::now_utc(),
            state.config().urgent_threshold_secs,
        );
        let tick = TimerTick {
            viewer_id,
            state: board.state,
            timer: reading.into(),
        };
        send_public_event(&state, EVENT_VIEW_TICK, &tick);
    }
}

fn send_public_event(state: &SharedState, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.public_sse().broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize public SSE payload"),
    }
}
