//! Outbound side of the relay: the backend REST API and its streaming feed.

/// Connection settings for the REST client.
pub mod config;
/// Backend and feed error types.
pub mod error;
/// Scriptable in-memory backend for tests.
#[cfg(test)]
pub mod fake;
/// Streaming feed subscription.
pub mod feed;
/// `reqwest` implementation of [`ScoreboardApi`].
pub mod http;
/// Bearer credential and sign-out signal.
pub mod session;

use futures::future::BoxFuture;

use crate::{
    client::error::ApiResult,
    dto::competition::{
        CompetitionListPage, CompetitionSettings, CreateCompetitionRequest, ListCursor,
        ManageDetail, ManagedBoard, PatchCompetitionRequest, ScorePatch, SignInRequest,
        SignInResponse, StateAction,
    },
    state::board::{ScoreBoard, ScoreChangeLog},
};

pub use self::{
    config::ApiConfig,
    error::{ApiError, ClientBuildError, FeedError},
    http::HttpScoreboardApi,
    session::AuthSession,
};

/// Abstraction over the scoreboard backend REST API.
///
/// Reads that can legitimately come back empty return `Option`; writes succeed only on
/// `200 OK`.
pub trait ScoreboardApi: Send + Sync {
    /// Public snapshot of a viewer; `None` on an empty body.
    fn fetch_public_snapshot(
        &self,
        viewer_id: &str,
    ) -> BoxFuture<'static, ApiResult<Option<ScoreBoard>>>;
    /// Score history of a viewer, oldest first.
    fn fetch_history(&self, viewer_id: &str) -> BoxFuture<'static, ApiResult<Vec<ScoreChangeLog>>>;
    /// One page of public competitions.
    fn fetch_competition_list(
        &self,
        size: u32,
        cursor: Option<ListCursor>,
    ) -> BoxFuture<'static, ApiResult<CompetitionListPage>>;
    /// Settings detail of a competition.
    fn fetch_settings(
        &self,
        competition_id: &str,
    ) -> BoxFuture<'static, ApiResult<Option<CompetitionSettings>>>;
    /// Create a competition; returns the backend body when there is one.
    fn create_competition(
        &self,
        request: CreateCompetitionRequest,
    ) -> BoxFuture<'static, ApiResult<Option<serde_json::Value>>>;
    /// Replace settings and teams of a competition.
    fn patch_competition(
        &self,
        competition_id: &str,
        request: PatchCompetitionRequest,
    ) -> BoxFuture<'static, ApiResult<()>>;
    /// Post a lifecycle action.
    fn change_state(
        &self,
        competition_id: &str,
        action: StateAction,
    ) -> BoxFuture<'static, ApiResult<()>>;
    /// Boards the signed-in administrator manages.
    fn list_managed_boards(&self) -> BoxFuture<'static, ApiResult<Vec<ManagedBoard>>>;
    /// Manage detail behind a manage identifier.
    fn fetch_manage_detail(
        &self,
        manage_id: &str,
    ) -> BoxFuture<'static, ApiResult<Option<ManageDetail>>>;
    /// Submit one manual score adjustment.
    fn patch_score(
        &self,
        competition_id: &str,
        team_id: &str,
        patch: ScorePatch,
    ) -> BoxFuture<'static, ApiResult<()>>;
    /// Exchange credentials for an access token.
    fn sign_in(&self, credentials: SignInRequest) -> BoxFuture<'static, ApiResult<SignInResponse>>;
}
