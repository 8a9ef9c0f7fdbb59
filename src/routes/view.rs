//! Mount and unmount routes.

use axum::{Json, Router, extract::State, http::StatusCode, routing::put};
use axum_valid::Valid;

use crate::{
    dto::admin::{MountRequest, MountResponse},
    services::view_service,
    state::SharedState,
};

/// Endpoints choosing which scoreboard the relay follows.
pub fn router() -> Router<SharedState> {
    Router::new().route("/view", put(mount_view).delete(unmount_view))
}

/// Follow a viewer identifier, replacing the current one.
#[utoipa::path(
    put,
    path = "/view",
    tag = "view",
    request_body = MountRequest,
    responses(
        (status = 200, description = "Viewer mounted", body = MountResponse),
        (status = 400, description = "Malformed viewer identifier")
    )
)]
pub async fn mount_view(
    State(state): State<SharedState>,
    Valid(Json(request)): Valid<Json<MountRequest>>,
) -> Json<MountResponse> {
    Json(view_service::mount(&state, request.viewer_id).await)
}

/// Stop following the current viewer identifier.
#[utoipa::path(
    delete,
    path = "/view",
    tag = "view",
    responses(
        (status = 204, description = "View unmounted"),
        (status = 404, description = "Nothing was mounted")
    )
)]
pub async fn unmount_view(State(state): State<SharedState>) -> StatusCode {
    if view_service::unmount(&state).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}
