//! Backend sign-in routes.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use axum_valid::Valid;

use crate::{
    dto::{admin::SessionStatus, competition::SignInRequest},
    error::AppError,
    services::session_service,
    state::SharedState,
};

/// Sign-in boundary towards the backend.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/admin/session", get(session_status))
        .route("/admin/session/sign-in", post(sign_in))
        .route("/admin/session/sign-out", post(sign_out))
}

#[utoipa::path(
    get,
    path = "/admin/session",
    tag = "session",
    responses((status = 200, description = "Current sign-in state", body = SessionStatus))
)]
/// Report whether the relay holds a backend credential.
pub async fn session_status(State(state): State<SharedState>) -> Json<SessionStatus> {
    Json(session_service::status(&state).await)
}

/// Exchange credentials for a backend token held in memory.
#[utoipa::path(
    post,
    path = "/admin/session/sign-in",
    tag = "session",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in", body = SessionStatus),
        (status = 401, description = "Credentials rejected")
    )
)]
pub async fn sign_in(
    State(state): State<SharedState>,
    Valid(Json(credentials)): Valid<Json<SignInRequest>>,
) -> Result<Json<SessionStatus>, AppError> {
    Ok(Json(session_service::sign_in(&state, credentials).await?))
}

/// Drop the backend token and any open manage board.
#[utoipa::path(
    post,
    path = "/admin/session/sign-out",
    tag = "session",
    responses((status = 200, description = "Signed out", body = SessionStatus))
)]
pub async fn sign_out(State(state): State<SharedState>) -> Json<SessionStatus> {
    Json(session_service::sign_out(&state).await)
}
