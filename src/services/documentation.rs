use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the scoreboard relay.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::public::get_view,
        crate::routes::public::get_history,
        crate::routes::public::list_competitions,
        crate::routes::view::mount_view,
        crate::routes::view::unmount_view,
        crate::routes::sse::public_stream,
        crate::routes::session::session_status,
        crate::routes::session::sign_in,
        crate::routes::session::sign_out,
        crate::routes::admin::list_competitions,
        crate::routes::admin::create_competition,
        crate::routes::admin::get_settings,
        crate::routes::admin::patch_settings,
        crate::routes::admin::change_state,
        crate::routes::admin::open_board,
        crate::routes::admin::current_board,
        crate::routes::admin::close_board,
        crate::routes::admin::increment,
        crate::routes::admin::decrement,
        crate::routes::admin::set_reason,
        crate::routes::admin::clear_reason,
        crate::routes::admin::submit,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::sse::Handshake,
            crate::dto::sse::ViewMounted,
            crate::dto::view::ScoreboardView,
            crate::dto::view::TimerTick,
            crate::state::board::ScoreBoard,
            crate::dto::competition::StateAction,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "public", description = "Read-only projections of the mounted scoreboard"),
        (name = "view", description = "Choose which scoreboard the relay follows"),
        (name = "sse", description = "Server-sent events streams"),
        (name = "session", description = "Backend sign-in"),
        (name = "admin", description = "Competition management"),
        (name = "scores", description = "Pending score adjustments and submission"),
    )
)]
/// OpenAPI document of the local relay API.
pub struct ApiDoc;
