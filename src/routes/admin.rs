//! Competition management and manage-board score workflow routes.

use axum::{
    Json, Router,
    body::Body,
    extract::{Path, Query, State},
    http::{Request, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
};
use axum_valid::Valid;

use crate::{
    dto::{
        admin::{ActionQuery, ManageBoardView, ReasonRequest},
        competition::{
            CompetitionSettings, CreateCompetitionRequest, ManagedBoard, PatchCompetitionRequest,
        },
    },
    error::AppError,
    services::{admin_service, score_service},
    state::SharedState,
};

/// Admin-only endpoints for competition management and the score workflow.
pub fn router(state: SharedState) -> Router<SharedState> {
    Router::new()
        .route(
            "/admin/competitions",
            get(list_competitions).post(create_competition),
        )
        .route(
            "/admin/competitions/{id}",
            get(get_settings).patch(patch_settings),
        )
        .route("/admin/competitions/{id}/actions", post(change_state))
        .route("/admin/manage", get(current_board).delete(close_board))
        .route("/admin/manage/{manage_id}", put(open_board))
        .route("/admin/manage/teams/{team_id}/increment", post(increment))
        .route("/admin/manage/teams/{team_id}/decrement", post(decrement))
        .route(
            "/admin/manage/teams/{team_id}/reason",
            put(set_reason).delete(clear_reason),
        )
        .route("/admin/manage/teams/{team_id}/submit", post(submit))
        .route_layer(middleware::from_fn_with_state(state, require_session))
}

/// Competitions owned by the signed-in administrator.
#[utoipa::path(
    get,
    path = "/admin/competitions",
    tag = "admin",
    responses((status = 200, description = "Own competitions", body = [ManagedBoard]))
)]
pub async fn list_competitions(
    State(state): State<SharedState>,
) -> Result<Json<Vec<ManagedBoard>>, AppError> {
    Ok(Json(admin_service::list_managed_boards(&state).await?))
}

/// Create a competition on the backend.
#[utoipa::path(
    post,
    path = "/admin/competitions",
    tag = "admin",
    request_body = CreateCompetitionRequest,
    responses(
        (status = 200, description = "Backend response body, `null` when empty", body = Object),
        (status = 502, description = "Backend rejected the request")
    )
)]
pub async fn create_competition(
    State(state): State<SharedState>,
    Valid(Json(request)): Valid<Json<CreateCompetitionRequest>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let created = admin_service::create_competition(&state, request).await?;
    Ok(Json(created.unwrap_or_default()))
}

#[utoipa::path(
    get,
    path = "/admin/competitions/{id}",
    tag = "admin",
    params(("id" = String, Path, description = "Internal competition identifier")),
    responses((status = 200, description = "Competition settings", body = CompetitionSettings))
)]
/// Return the settings of one competition.
pub async fn get_settings(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<CompetitionSettings>, AppError> {
    Ok(Json(admin_service::get_settings(&state, &id).await?))
}

/// Replace the settings and team list of a competition.
#[utoipa::path(
    patch,
    path = "/admin/competitions/{id}",
    tag = "admin",
    params(("id" = String, Path, description = "Internal competition identifier")),
    request_body = PatchCompetitionRequest,
    responses((status = 200, description = "Settings after the patch", body = CompetitionSettings))
)]
pub async fn patch_settings(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Valid(Json(request)): Valid<Json<PatchCompetitionRequest>>,
) -> Result<Json<CompetitionSettings>, AppError> {
    Ok(Json(
        admin_service::patch_settings(&state, &id, request).await?,
    ))
}

/// Start, pause, resume or close a competition.
#[utoipa::path(
    post,
    path = "/admin/competitions/{id}/actions",
    tag = "admin",
    params(("id" = String, Path, description = "Internal competition identifier"), ActionQuery),
    responses(
        (status = 200, description = "Settings after the action", body = CompetitionSettings),
        (status = 502, description = "Backend did not answer 200")
    )
)]
pub async fn change_state(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Query(query): Query<ActionQuery>,
) -> Result<Json<CompetitionSettings>, AppError> {
    Ok(Json(
        admin_service::change_state(&state, &id, query.mode).await?,
    ))
}

/// Open the score workflow for a manage identifier.
#[utoipa::path(
    put,
    path = "/admin/manage/{manage_id}",
    tag = "scores",
    params(("manage_id" = String, Path, description = "Manage identifier of the competition")),
    responses((status = 200, description = "Board with fresh pending entries", body = ManageBoardView))
)]
pub async fn open_board(
    State(state): State<SharedState>,
    Path(manage_id): Path<String>,
) -> Result<Json<ManageBoardView>, AppError> {
    Ok(Json(score_service::open_board(&state, manage_id).await?))
}

#[utoipa::path(
    get,
    path = "/admin/manage",
    tag = "scores",
    responses(
        (status = 200, description = "Open board", body = ManageBoardView),
        (status = 409, description = "No board is open")
    )
)]
/// Return the open manage board.
pub async fn current_board(
    State(state): State<SharedState>,
) -> Result<Json<ManageBoardView>, AppError> {
    Ok(Json(score_service::current_board(&state).await?))
}

#[utoipa::path(
    delete,
    path = "/admin/manage",
    tag = "scores",
    responses((status = 204, description = "Board closed"), (status = 404, description = "No board was open"))
)]
/// Close the open manage board and drop its pending adjustments.
pub async fn close_board(State(state): State<SharedState>) -> StatusCode {
    if score_service::close_board(&state).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

#[utoipa::path(
    post,
    path = "/admin/manage/teams/{team_id}/increment",
    tag = "scores",
    params(("team_id" = String, Path, description = "Team identifier")),
    responses((status = 200, description = "Pending delta raised by one", body = ManageBoardView))
)]
/// Raise the pending delta of a team by one.
pub async fn increment(
    State(state): State<SharedState>,
    Path(team_id): Path<String>,
) -> Result<Json<ManageBoardView>, AppError> {
    Ok(Json(score_service::increment(&state, &team_id).await?))
}

#[utoipa::path(
    post,
    path = "/admin/manage/teams/{team_id}/decrement",
    tag = "scores",
    params(("team_id" = String, Path, description = "Team identifier")),
    responses((status = 200, description = "Pending delta lowered by one", body = ManageBoardView))
)]
/// Lower the pending delta of a team by one.
pub async fn decrement(
    State(state): State<SharedState>,
    Path(team_id): Path<String>,
) -> Result<Json<ManageBoardView>, AppError> {
    Ok(Json(score_service::decrement(&state, &team_id).await?))
}

#[utoipa::path(
    put,
    path = "/admin/manage/teams/{team_id}/reason",
    tag = "scores",
    params(("team_id" = String, Path, description = "Team identifier")),
    request_body = ReasonRequest,
    responses((status = 200, description = "Pending reason replaced", body = ManageBoardView))
)]
/// Replace the pending reason of a team.
pub async fn set_reason(
    State(state): State<SharedState>,
    Path(team_id): Path<String>,
    Json(request): Json<ReasonRequest>,
) -> Result<Json<ManageBoardView>, AppError> {
    Ok(Json(
        score_service::set_reason(&state, &team_id, request.reason).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/admin/manage/teams/{team_id}/reason",
    tag = "scores",
    params(("team_id" = String, Path, description = "Team identifier")),
    responses((status = 200, description = "Pending reason cleared", body = ManageBoardView))
)]
/// Clear the pending reason of a team.
pub async fn clear_reason(
    State(state): State<SharedState>,
    Path(team_id): Path<String>,
) -> Result<Json<ManageBoardView>, AppError> {
    Ok(Json(score_service::clear_reason(&state, &team_id).await?))
}

/// Submit the team's pending adjustment and resynchronise the board.
#[utoipa::path(
    post,
    path = "/admin/manage/teams/{team_id}/submit",
    tag = "scores",
    params(("team_id" = String, Path, description = "Team identifier")),
    responses(
        (status = 200, description = "Board refetched after the submission", body = ManageBoardView),
        (status = 502, description = "Backend rejected the adjustment; pending values are kept")
    )
)]
pub async fn submit(
    State(state): State<SharedState>,
    Path(team_id): Path<String>,
) -> Result<Json<ManageBoardView>, AppError> {
    Ok(Json(score_service::submit(&state, &team_id).await?))
}

async fn require_session(
    State(state): State<SharedState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    if state.session().is_signed_in().await {
        Ok(next.run(req).await)
    } else {
        Err(AppError::Unauthorized(
            "sign in through `/admin/session/sign-in` first".into(),
        ))
    }
}
