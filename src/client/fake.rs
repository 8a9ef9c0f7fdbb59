//! In-memory [`ScoreboardApi`] used by unit tests.

use std::sync::Mutex;

use futures::future::BoxFuture;
use reqwest::StatusCode;
use tokio::sync::watch;

use crate::{
    client::{
        ScoreboardApi,
        error::{ApiError, ApiResult},
    },
    dto::competition::{
        CompetitionListPage, CompetitionSettings, CreateCompetitionRequest, JwtToken, ListCursor,
        ManageDetail, ManagedBoard, PatchCompetitionRequest, ScorePatch, SignInRequest,
        SignInResponse, StateAction,
    },
    state::board::{ScoreBoard, ScoreChangeLog},
};

#[derive(Default)]
struct Scripted {
    snapshot: Option<ScoreBoard>,
    history: Vec<ScoreChangeLog>,
    read_failure: Option<StatusCode>,
    manage_detail: Option<ManageDetail>,
    manage_fetches: usize,
    patch_failure: Option<StatusCode>,
    patches: Vec<(String, String, ScorePatch)>,
    settings: Option<CompetitionSettings>,
    action_failure: Option<StatusCode>,
    actions: Vec<(String, StateAction)>,
    list_calls: Vec<(u32, Option<ListCursor>)>,
    managed: Vec<ManagedBoard>,
    token: Option<String>,
}

/// Scripted backend. Public reads block until [`FakeApi::release`] when built gated.
pub struct FakeApi {
    scripted: Mutex<Scripted>,
    gate: watch::Sender<bool>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeApi {
    /// Empty backend: reads return nothing, writes succeed.
    pub fn new() -> Self {
        let (gate, _rx) = watch::channel(true);
        Self {
            scripted: Mutex::new(Scripted::default()),
            gate,
        }
    }

    /// Hold public snapshot and history reads until [`FakeApi::release`].
    pub fn gated() -> Self {
        let api = Self::new();
        api.gate.send_replace(false);
        api
    }

    /// Let gated reads through.
    pub fn release(&self) {
        self.gate.send_replace(true);
    }

    /// Serve `board` and `history` from the public reads.
    pub fn with_board(self, board: ScoreBoard, history: Vec<ScoreChangeLog>) -> Self {
        {
            let mut scripted = self.lock();
            scripted.snapshot = Some(board);
            scripted.history = history;
        }
        self
    }

    /// Answer every public read with `status`.
    pub fn fail_reads(&self, status: StatusCode) {
        self.lock().read_failure = Some(status);
    }

    /// Serve `detail` from manage detail reads.
    pub fn set_manage_detail(&self, detail: ManageDetail) {
        self.lock().manage_detail = Some(detail);
    }

    /// Number of manage detail reads so far.
    pub fn manage_fetches(&self) -> usize {
        self.lock().manage_fetches
    }

    /// Answer score patches with `status`; `None` accepts them again.
    pub fn fail_patches(&self, status: Option<StatusCode>) {
        self.lock().patch_failure = status;
    }

    /// Accepted score patches as (competition, team, patch).
    pub fn patches(&self) -> Vec<(String, String, ScorePatch)> {
        self.lock().patches.clone()
    }

    /// Serve `settings` from settings reads.
    pub fn set_settings(&self, settings: CompetitionSettings) {
        self.lock().settings = Some(settings);
    }

    /// Answer state actions with `status`; `None` accepts them again.
    pub fn fail_actions(&self, status: Option<StatusCode>) {
        self.lock().action_failure = status;
    }

    /// Accepted state actions.
    pub fn actions(&self) -> Vec<(String, StateAction)> {
        self.lock().actions.clone()
    }

    /// Page size and cursor of every list read.
    pub fn list_calls(&self) -> Vec<(u32, Option<ListCursor>)> {
        self.lock().list_calls.clone()
    }

    /// Serve `boards` from the managed list.
    pub fn set_managed(&self, boards: Vec<ManagedBoard>) {
        self.lock().managed = boards;
    }

    /// Token returned by the next sign-ins.
    pub fn issue_token(&self, token: &str) {
        self.lock().token = Some(token.to_string());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Scripted> {
        self.scripted.lock().unwrap()
    }

    fn wait_for_gate(&self) -> BoxFuture<'static, ()> {
        let mut gate = self.gate.subscribe();
        Box::pin(async move {
            let _ = gate.wait_for(|open| *open).await;
        })
    }
}

fn server(path: &str, status: StatusCode) -> ApiError {
    ApiError::Server {
        path: path.to_string(),
        status,
    }
}

impl ScoreboardApi for FakeApi {
    fn fetch_public_snapshot(
        &self,
        _viewer_id: &str,
    ) -> BoxFuture<'static, ApiResult<Option<ScoreBoard>>> {
        let gate = self.wait_for_gate();
        let result = {
            let scripted = self.lock();
            match scripted.read_failure {
                Some(status) => Err(server("snapshot", status)),
                None => Ok(scripted.snapshot.clone()),
            }
        };
        Box::pin(async move {
            gate.await;
            result
        })
    }

    fn fetch_history(&self, _viewer_id: &str) -> BoxFuture<'static, ApiResult<Vec<ScoreChangeLog>>> {
        let gate = self.wait_for_gate();
        let result = {
            let scripted = self.lock();
            match scripted.read_failure {
                Some(status) => Err(server("history", status)),
                None => Ok(scripted.history.clone()),
            }
        };
        Box::pin(async move {
            gate.await;
            result
        })
    }

    fn fetch_competition_list(
        &self,
        size: u32,
        cursor: Option<ListCursor>,
    ) -> BoxFuture<'static, ApiResult<CompetitionListPage>> {
        self.lock().list_calls.push((size, cursor));
        Box::pin(async { Ok(CompetitionListPage::default()) })
    }

    fn fetch_settings(
        &self,
        _competition_id: &str,
    ) -> BoxFuture<'static, ApiResult<Option<CompetitionSettings>>> {
        let settings = self.lock().settings.clone();
        Box::pin(async move { Ok(settings) })
    }

    fn create_competition(
        &self,
        request: CreateCompetitionRequest,
    ) -> BoxFuture<'static, ApiResult<Option<serde_json::Value>>> {
        Box::pin(async move { Ok(Some(serde_json::json!({ "name": request.name }))) })
    }

    fn patch_competition(
        &self,
        _competition_id: &str,
        _request: PatchCompetitionRequest,
    ) -> BoxFuture<'static, ApiResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn change_state(
        &self,
        competition_id: &str,
        action: StateAction,
    ) -> BoxFuture<'static, ApiResult<()>> {
        let result = {
            let mut scripted = self.lock();
            match scripted.action_failure {
                Some(status) => Err(server("actions", status)),
                None => {
                    scripted.actions.push((competition_id.to_string(), action));
                    Ok(())
                }
            }
        };
        Box::pin(async move { result })
    }

    fn list_managed_boards(&self) -> BoxFuture<'static, ApiResult<Vec<ManagedBoard>>> {
        let boards = self.lock().managed.clone();
        Box::pin(async move { Ok(boards) })
    }

    fn fetch_manage_detail(
        &self,
        _manage_id: &str,
    ) -> BoxFuture<'static, ApiResult<Option<ManageDetail>>> {
        let detail = {
            let mut scripted = self.lock();
            scripted.manage_fetches += 1;
            scripted.manage_detail.clone()
        };
        Box::pin(async move { Ok(detail) })
    }

    fn patch_score(
        &self,
        competition_id: &str,
        team_id: &str,
        patch: ScorePatch,
    ) -> BoxFuture<'static, ApiResult<()>> {
        let result = {
            let mut scripted = self.lock();
            match scripted.patch_failure {
                Some(status) => Err(server("scores", status)),
                None => {
                    scripted
                        .patches
                        .push((competition_id.to_string(), team_id.to_string(), patch));
                    Ok(())
                }
            }
        };
        Box::pin(async move { result })
    }

    fn sign_in(&self, _credentials: SignInRequest) -> BoxFuture<'static, ApiResult<SignInResponse>> {
        let token = self.lock().token.clone();
        Box::pin(async move {
            Ok(SignInResponse {
                jwt_token: token.map(|access_token| JwtToken { access_token }),
            })
        })
    }
}
