//! Competition management on behalf of the signed-in administrator.
//! Every failure here is user initiated and surfaced to the caller.

use tracing::{info, warn};

use crate::{
    dto::{
        competition::{
            CompetitionSettings, CreateCompetitionRequest, ManagedBoard, PatchCompetitionRequest,
            StateAction,
        },
        validation::ensure_public_id,
    },
    error::ServiceError,
    state::SharedState,
};

/// Competitions owned by the signed-in administrator.
pub async fn list_managed_boards(state: &SharedState) -> Result<Vec<ManagedBoard>, ServiceError> {
    Ok(state.api().list_managed_boards().await?)
}

/// Create a competition. Returns the backend's response body, if any.
pub async fn create_competition(
    state: &SharedState,
    request: CreateCompetitionRequest,
) -> Result<Option<serde_json::Value>, ServiceError> {
    let name = request.name.clone();
    let created = state.api().create_competition(request).await?;
    info!(name, "competition created");
    Ok(created)
}

/// Settings detail of one competition.
pub async fn get_settings(
    state: &SharedState,
    competition_id: &str,
) -> Result<CompetitionSettings, ServiceError> {
    ensure_public_id("competition", competition_id)?;
    state
        .api()
        .fetch_settings(competition_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("competition `{competition_id}`")))
}

/// Patch the settings, then return the detail as the backend now sees it.
pub async fn patch_settings(
    state: &SharedState,
    competition_id: &str,
    request: PatchCompetitionRequest,
) -> Result<CompetitionSettings, ServiceError> {
    ensure_public_id("competition", competition_id)?;
    state
        .api()
        .patch_competition(competition_id, request)
        .await?;
    info!(competition_id, "competition settings patched");
    get_settings(state, competition_id).await
}

/// Post a lifecycle action. Success is a `200 OK`; the refreshed detail is returned.
pub async fn change_state(
    state: &SharedState,
    competition_id: &str,
    action: StateAction,
) -> Result<CompetitionSettings, ServiceError> {
    ensure_public_id("competition", competition_id)?;
    if let Err(err) = state.api().change_state(competition_id, action).await {
        warn!(competition_id, mode = action.as_str(), error = %err, "state action rejected");
        return Err(err.into());
    }
    info!(competition_id, mode = action.as_str(), "state action applied");
    get_settings(state, competition_id).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use reqwest::StatusCode;

    use super::*;
    use crate::{
        client::{ApiError, AuthSession, fake::FakeApi},
        config::AppConfig,
        state::{AppState, board::CompetitionState},
    };

    fn settings(state: CompetitionState) -> CompetitionSettings {
        CompetitionSettings {
            competition_id: "c1".into(),
            name: "Cup".into(),
            announcement: String::new(),
            description: String::new(),
            start_time: "2026-01-01T00:00:00Z".into(),
            total_time: 600,
            state,
            teams: Vec::new(),
        }
    }

    fn state_with(api: Arc<FakeApi>) -> SharedState {
        AppState::new(
            AppConfig::default(),
            api,
            Arc::new(AuthSession::new(Some("token".into()))),
        )
    }

    #[tokio::test]
    async fn action_refetches_settings() {
        let api = Arc::new(FakeApi::new());
        api.set_settings(settings(CompetitionState::Running));
        let state = state_with(api.clone());

        let refreshed = change_state(&state, "c1", StateAction::Start).await.unwrap();
        assert_eq!(refreshed.state, CompetitionState::Running);
        assert_eq!(api.actions(), vec![("c1".to_string(), StateAction::Start)]);
    }

    #[tokio::test]
    async fn non_ok_action_is_surfaced() {
        let api = Arc::new(FakeApi::new());
        api.fail_actions(Some(StatusCode::CREATED));
        let state = state_with(api.clone());

        let err = change_state(&state, "c1", StateAction::Pause).await.unwrap_err();
        match err {
            ServiceError::Backend(ApiError::Server { status, .. }) => {
                assert_eq!(status, StatusCode::CREATED)
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(api.actions().is_empty());
    }

    #[tokio::test]
    async fn missing_settings_is_not_found() {
        let state = state_with(Arc::new(FakeApi::new()));
        assert!(matches!(
            get_settings(&state, "c9").await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn identifiers_that_would_reshape_the_backend_path_are_rejected() {
        let api = Arc::new(FakeApi::new());
        api.set_settings(settings(CompetitionState::Running));
        let state = state_with(api.clone());

        let err = change_state(&state, "x/../../../auth/sign-in", StateAction::Close)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
        assert!(matches!(
            get_settings(&state, "x?mode=close").await,
            Err(ServiceError::InvalidInput(_))
        ));
        assert!(api.actions().is_empty());
    }
}
