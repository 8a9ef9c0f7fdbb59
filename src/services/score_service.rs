//! Admin score workflow: pending per-team adjustments submitted one team at a time.

use tracing::{debug, info, warn};

use crate::{
    dto::{admin::ManageBoardView, competition::ScorePatch, validation::ensure_public_id},
    error::ServiceError,
    state::{SharedState, manage::ManageSession},
};

fn no_board() -> ServiceError {
    ServiceError::InvalidState("no manage board is open".into())
}

fn unknown_team(team_id: &str) -> ServiceError {
    ServiceError::NotFound(format!("team `{team_id}` is not on the open board"))
}

/// Load the detail behind `manage_id` and start a fresh workflow on it.
pub async fn open_board(
    state: &SharedState,
    manage_id: String,
) -> Result<ManageBoardView, ServiceError> {
    ensure_public_id("manage", &manage_id)?;
    let detail = state
        .api()
        .fetch_manage_detail(&manage_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("manage board `{manage_id}`")))?;

    info!(manage_id, competition_id = detail.competition_id, "manage board opened");
    let session = ManageSession::new(manage_id, detail);
    let view = ManageBoardView::from(&session);
    *state.manage().write().await = Some(session);
    Ok(view)
}

/// Current board with its pending adjustments.
pub async fn current_board(state: &SharedState) -> Result<ManageBoardView, ServiceError> {
    let guard = state.manage().read().await;
    guard.as_ref().map(ManageBoardView::from).ok_or_else(no_board)
}

/// Forget the open board and every pending adjustment.
pub async fn close_board(state: &SharedState) -> bool {
    state.manage().write().await.take().is_some()
}

/// Add one to the team's pending delta.
pub async fn increment(state: &SharedState, team_id: &str) -> Result<ManageBoardView, ServiceError> {
    edit(state, team_id, |session| session.increment(team_id).is_some()).await
}

/// Subtract one from the team's pending delta.
pub async fn decrement(state: &SharedState, team_id: &str) -> Result<ManageBoardView, ServiceError> {
    edit(state, team_id, |session| session.decrement(team_id).is_some()).await
}

/// Replace the team's pending reason.
pub async fn set_reason(
    state: &SharedState,
    team_id: &str,
    reason: String,
) -> Result<ManageBoardView, ServiceError> {
    edit(state, team_id, |session| {
        session.set_reason(team_id, reason).is_some()
    })
    .await
}

/// Clear the team's pending reason, keeping its delta.
pub async fn clear_reason(
    state: &SharedState,
    team_id: &str,
) -> Result<ManageBoardView, ServiceError> {
    edit(state, team_id, |session| {
        let known = session.pending(team_id).is_some();
        session.clear_reason(team_id);
        known
    })
    .await
}

/// Send the team's pending adjustment, then resynchronise from the backend.
///
/// A rejected submission keeps every pending value so it can be retried. After a
/// successful one the detail is refetched and all pending entries start over.
pub async fn submit(state: &SharedState, team_id: &str) -> Result<ManageBoardView, ServiceError> {
    let (manage_id, competition_id, pending) = {
        let guard = state.manage().read().await;
        let session = guard.as_ref().ok_or_else(no_board)?;
        let pending = session
            .pending(team_id)
            .cloned()
            .ok_or_else(|| unknown_team(team_id))?;
        (
            session.manage_id.clone(),
            session.detail.competition_id.clone(),
            pending,
        )
    };

    let api = state.api();
    let patch = ScorePatch::manual(pending.delta, pending.reason);
    if let Err(err) = api.patch_score(&competition_id, team_id, patch).await {
        warn!(manage_id, team_id, error = %err, "score submission rejected");
        return Err(err.into());
    }
    info!(manage_id, team_id, delta = pending.delta, "score submitted");

    let refreshed = match api.fetch_manage_detail(&manage_id).await {
        Ok(detail) => detail,
        Err(err) => {
            warn!(manage_id, error = %err, "failed to refetch manage board after submission");
            None
        }
    };

    let mut guard = state.manage().write().await;
    let session = guard.as_mut().ok_or_else(no_board)?;
    if session.manage_id != manage_id {
        debug!(manage_id, "manage board switched during submission");
        return Ok(ManageBoardView::from(&*session));
    }
    match refreshed {
        Some(detail) => session.replace_detail(detail),
        None => session.reset_team(team_id),
    }
    Ok(ManageBoardView::from(&*session))
}

async fn edit<F>(state: &SharedState, team_id: &str, change: F) -> Result<ManageBoardView, ServiceError>
where
    F: FnOnce(&mut ManageSession) -> bool,
{
    let mut guard = state.manage().write().await;
    let session = guard.as_mut().ok_or_else(no_board)?;
    if !change(session) {
        return Err(unknown_team(team_id));
    }
    Ok(ManageBoardView::from(&*session))
}
