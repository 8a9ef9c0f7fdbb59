//! Shared application state: backend handles, the mounted view and the admin session.

/// Canonical scoreboard entities and the live view model.
pub mod board;
/// Ranking and timer arithmetic.
pub mod clock;
/// Pending score adjustments of the open manage board.
pub mod manage;
/// Pure merge of feed messages into the view.
pub mod reducer;
mod sse;

use std::sync::Arc;

use tokio::{
    sync::{Mutex, RwLock},
    task::JoinHandle,
};

use crate::{
    client::{AuthSession, ScoreboardApi, feed::FeedSubscription},
    config::AppConfig,
    state::{board::LiveView, manage::ManageSession},
};

pub use self::sse::SseHub;

/// Handle to [`AppState`] passed to routes and tasks.
pub type SharedState = Arc<AppState>;

const SSE_CAPACITY: usize = 16;

/// Mounted viewer and its view model.
///
/// `epoch` grows on every mount and unmount. Writers capture it when they start and
/// are rejected once it moved on.
#[derive(Debug, Clone, Default)]
pub struct ViewSlot {
    /// Mount generation the view belongs to.
    pub epoch: u64,
    /// Mounted viewer; `None` when nothing is mounted.
    pub viewer_id: Option<String>,
    /// Merged view model.
    pub view: LiveView,
}

/// Background work owned by the current mount.
pub struct ViewTasks {
    /// Mount generation these tasks write for.
    pub epoch: u64,
    /// Viewer the tasks were started for.
    pub viewer_id: String,
    /// Initial REST load.
    pub bootstrap: JoinHandle<()>,
    /// Feed connection; `None` while connecting or when the feed is unavailable.
    pub feed: Option<FeedSubscription>,
    /// Loop applying feed frames; runs only alongside `feed`.
    pub merge: Option<JoinHandle<()>>,
}

/// Central application state: backend handles, the mounted view, and the admin session.
pub struct AppState {
    config: AppConfig,
    api: Arc<dyn ScoreboardApi>,
    session: Arc<AuthSession>,
    view: RwLock<ViewSlot>,
    view_tasks: Mutex<Option<ViewTasks>>,
    manage: RwLock<Option<ManageSession>>,
    sse: SseHub,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(
        config: AppConfig,
        api: Arc<dyn ScoreboardApi>,
        session: Arc<AuthSession>,
    ) -> SharedState {
        Arc::new(Self {
            config,
            api,
            session,
            view: RwLock::new(ViewSlot::default()),
            view_tasks: Mutex::new(None),
            manage: RwLock::new(None),
            sse: SseHub::new(SSE_CAPACITY),
        })
    }

    /// Configuration the relay was started with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Backend client shared by every service.
    pub fn api(&self) -> Arc<dyn ScoreboardApi> {
        self.api.clone()
    }

    /// Backend credential and its sign-out signal.
    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    /// Copy of the mounted viewer and its view.
    pub async fn read_view(&self) -> ViewSlot {
        self.view.read().await.clone()
    }

    /// Start a new mount epoch with an empty view. `None` unmounts.
    pub async fn begin_mount(&self, viewer_id: Option<String>) -> u64 {
        let mut slot = self.view.write().await;
        slot.epoch += 1;
        slot.viewer_id = viewer_id;
        slot.view = LiveView::default();
        slot.epoch
    }

    /// Apply `update` to the view if `epoch` is still current. Returns whether it ran.
    pub async fn update_view<F>(&self, epoch: u64, update: F) -> bool
    where
        F: FnOnce(LiveView) -> LiveView,
    {
        let mut slot = self.view.write().await;
        if slot.epoch != epoch {
            return false;
        }
        let view = std::mem::take(&mut slot.view);
        slot.view = update(view);
        true
    }

    /// Tasks of the current mount. Mount and unmount swap them under this lock; the
    /// feed handshake happens outside it.
    pub fn view_tasks(&self) -> &Mutex<Option<ViewTasks>> {
        &self.view_tasks
    }

    /// Whether the mounted view still has a live feed.
    pub async fn feed_active(&self) -> bool {
        self.view_tasks
            .lock()
            .await
            .as_ref()
            .and_then(|tasks| tasks.feed.as_ref())
            .is_some_and(FeedSubscription::is_active)
    }

    /// Admin score workflow opened through a manage identifier.
    pub fn manage(&self) -> &RwLock<Option<ManageSession>> {
        &self.manage
    }

    /// Broadcast hub used for the public SSE stream.
    pub fn public_sse(&self) -> &SseHub {
        &self.sse
    }
}
