//! Mount lifecycle of the live view: one viewer identifier, one feed, one merge loop.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{
    client::feed::FeedSubscription,
    dto::admin::MountResponse,
    services::{bootstrap, feed_service, sse_events},
    state::{SharedState, ViewTasks},
};

/// Mount `viewer_id`, replacing whatever was mounted before.
///
/// The previous feed is closed before the new one opens. Mounting the identifier that is
/// already mounted leaves everything as is. The feed handshake runs outside the
/// `view_tasks` lock, so an unmount issued meanwhile is not held up by a slow feed host.
pub async fn mount(state: &SharedState, viewer_id: String) -> MountResponse {
    let epoch = {
        let mut tasks = state.view_tasks().lock().await;
        if let Some(current) = tasks.as_ref() {
            if current.viewer_id == viewer_id {
                return MountResponse {
                    viewer_id,
                    feed_connected: current
                        .feed
                        .as_ref()
                        .is_some_and(FeedSubscription::is_active),
                };
            }
        }

        if let Some(previous) = tasks.take() {
            teardown(previous).await;
        }

        let epoch = state.begin_mount(Some(viewer_id.clone())).await;
        sse_events::broadcast_view_mounted(state, Some(viewer_id.clone()));
        info!(viewer_id, epoch, "mounting scoreboard view");

        let bootstrap = tokio::spawn({
            let state = state.clone();
            let viewer_id = viewer_id.clone();
            async move {
                bootstrap::load_initial(state, epoch, viewer_id).await;
            }
        });

        *tasks = Some(ViewTasks {
            epoch,
            viewer_id: viewer_id.clone(),
            bootstrap,
            feed: None,
            merge: None,
        });
        epoch
    };

    let config = state.config();
    let opened = FeedSubscription::open(
        &config.feed_url,
        &viewer_id,
        config.feed_buffer,
        config.feed_connect_timeout(),
    )
    .await;
    let feed_connected = match opened {
        Ok((feed, frames)) => attach_feed(state, epoch, feed, frames).await,
        Err(err) => {
            warn!(viewer_id, error = %err, "feed unavailable; view will not update live");
            false
        }
    };

    MountResponse {
        viewer_id,
        feed_connected,
    }
}

/// Hand an opened feed to the mount that asked for it. A feed that arrives after an
/// unmount or a newer mount is closed again.
async fn attach_feed(
    state: &SharedState,
    epoch: u64,
    feed: FeedSubscription,
    frames: mpsc::Receiver<String>,
) -> bool {
    let mut tasks = state.view_tasks().lock().await;
    if let Some(current) = tasks.as_mut().filter(|current| current.epoch == epoch) {
        info!(epoch, feed_id = %feed.id(), "feed attached");
        current.merge = Some(tokio::spawn(feed_service::run_merge_loop(
            state.clone(),
            epoch,
            frames,
        )));
        current.feed = Some(feed);
        return true;
    }
    drop(tasks);

    debug!(epoch, feed_id = %feed.id(), "mount superseded while connecting; closing feed");
    feed.close().await;
    false
}

/// Close the feed, stop pending work, and clear the view. Returns whether anything was mounted.
pub async fn unmount(state: &SharedState) -> bool {
    let mut tasks = state.view_tasks().lock().await;
    let previous = tasks.take();
    state.begin_mount(None).await;

    let Some(previous) = previous else {
        return false;
    };
    info!(viewer_id = previous.viewer_id, "unmounting scoreboard view");
    teardown(previous).await;
    sse_events::broadcast_view_mounted(state, None);
    true
}

async fn teardown(tasks: ViewTasks) {
    let ViewTasks {
        epoch,
        bootstrap,
        feed,
        merge,
        ..
    } = tasks;

    bootstrap.abort();
    if let Some(feed) = feed {
        feed.close().await;
    }
    if let Some(merge) = merge {
        if let Err(err) = merge.await {
            warn!(epoch, error = %err, "merge loop did not stop cleanly");
        }
    }
}
