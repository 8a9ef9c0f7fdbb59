//! Read-only routes over the mounted view.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::{
        admin::ListQuery,
        competition::CompetitionListPage,
        view::{HistoryResponse, ViewResponse},
    },
    error::AppError,
    services::public_service,
    state::SharedState,
};

/// Read-only endpoints backed by the mounted view.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/public/view", get(get_view))
        .route("/public/history", get(get_history))
        .route("/public/competitions", get(list_competitions))
}

/// Ranked teams, timers and history of the mounted scoreboard.
#[utoipa::path(
    get,
    path = "/public/view",
    tag = "public",
    responses(
        (status = 200, description = "Mounted scoreboard; `loading` until the first snapshot", body = ViewResponse),
        (status = 404, description = "Nothing is mounted")
    )
)]
pub async fn get_view(State(state): State<SharedState>) -> Result<Json<ViewResponse>, AppError> {
    Ok(Json(public_service::get_view(&state).await?))
}

#[utoipa::path(
    get,
    path = "/public/history",
    tag = "public",
    responses(
        (status = 200, description = "Score history in arrival order", body = HistoryResponse),
        (status = 404, description = "Nothing is mounted")
    )
)]
/// Return the score history of the mounted competition.
pub async fn get_history(
    State(state): State<SharedState>,
) -> Result<Json<HistoryResponse>, AppError> {
    Ok(Json(public_service::get_history(&state).await?))
}

/// Cursor-paginated public competition list.
#[utoipa::path(
    get,
    path = "/public/competitions",
    tag = "public",
    params(ListQuery),
    responses((status = 200, description = "One page of public competitions", body = CompetitionListPage))
)]
pub async fn list_competitions(
    State(state): State<SharedState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<CompetitionListPage>, AppError> {
    Ok(Json(public_service::list_competitions(&state, query).await?))
}
