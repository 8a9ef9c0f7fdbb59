//! Initial REST load of a mounted view.

use tracing::{debug, info, warn};

use crate::{
    services::sse_events,
    state::{SharedState, reducer},
};

/// What happened to a bootstrap attempt. Only used for logs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// Snapshot and history were installed.
    Applied,
    /// The backend had no snapshot yet; the view keeps loading.
    NoData,
    /// One of the reads failed; the view is untouched.
    Failed,
    /// A full snapshot had already been streamed.
    Discarded,
    /// The view was unmounted or remounted while the reads were pending.
    Superseded,
}

/// Fetch snapshot and history concurrently and install them if `epoch` is still current.
///
/// Failures never reach the viewer: they are logged and the view keeps its prior state.
pub async fn load_initial(state: SharedState, epoch: u64, viewer_id: String) -> BootstrapOutcome {
    let api = state.api();
    let (snapshot, history) = tokio::join!(
        api.fetch_public_snapshot(&viewer_id),
        api.fetch_history(&viewer_id)
    );

    let snapshot = match snapshot {
        Ok(snapshot) => snapshot,
        Err(err) => {
            warn!(viewer_id, error = %err, "failed to load scoreboard snapshot");
            return BootstrapOutcome::Failed;
        }
    };
    let history = match history {
        Ok(history) => history,
        Err(err) => {
            warn!(viewer_id, error = %err, "failed to load scoreboard history");
            return BootstrapOutcome::Failed;
        }
    };
    let Some(board) = snapshot else {
        info!(viewer_id, "no scoreboard snapshot available yet");
        return BootstrapOutcome::NoData;
    };

    let mut outcome = BootstrapOutcome::Applied;
    let current = state
        .update_view(epoch, |view| {
            if view.snapshot_streamed {
                outcome = BootstrapOutcome::Discarded;
            }
            reducer::apply_bootstrap(view, board, history)
        })
        .await;

    if !current {
        debug!(viewer_id, epoch, "view changed during bootstrap; dropping result");
        return BootstrapOutcome::Superseded;
    }
    match outcome {
        BootstrapOutcome::Applied => {
            info!(viewer_id, "scoreboard bootstrapped");
            sse_events::broadcast_view(&state).await;
        }
        _ => debug!(viewer_id, "full snapshot already streamed; bootstrap ignored"),
    }
    outcome
}
