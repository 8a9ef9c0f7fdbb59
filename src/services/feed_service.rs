//! Merge loop folding streamed feed messages into the mounted view.

use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use crate::{
    dto::feed::FeedMessage,
    services::sse_events,
    state::{SharedState, reducer},
};

/// Consume text frames until the feed ends or the view moves to another epoch.
///
/// Malformed frames are logged and dropped; they never stop the loop.
pub async fn run_merge_loop(state: SharedState, epoch: u64, mut frames: mpsc::Receiver<String>) {
    while let Some(text) = frames.recv().await {
        let message = FeedMessage::decode(&text);
        match &message {
            FeedMessage::Keepalive => {
                trace!(epoch, "feed keepalive");
                continue;
            }
            FeedMessage::Unrecognized { kind, reason } => {
                warn!(epoch, kind = ?kind, reason, "dropping unrecognized feed message");
                continue;
            }
            FeedMessage::FullSnapshot(_) | FeedMessage::ScoreDelta(_) => {
                debug!(epoch, message = message.label(), "applying feed message");
            }
        }

        if !state
            .update_view(epoch, |view| reducer::apply(view, message))
            .await
        {
            debug!(epoch, "view remounted; stopping merge loop");
            return;
        }
        sse_events::broadcast_view(&state).await;
    }
    info!(epoch, "feed ended; live updates stopped");
}
