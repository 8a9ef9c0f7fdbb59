//! HTTP surface of the relay.

use axum::Router;

use crate::state::SharedState;

/// Signed-in admin routes.
pub mod admin;
/// Swagger UI.
pub mod docs;
/// Health check route.
pub mod health;
/// Read-only view routes.
pub mod public;
/// Sign-in and sign-out routes.
pub mod session;
/// Server-Sent Events stream.
pub mod sse;
/// Mount and unmount of the viewer.
pub mod view;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(public::router())
        .merge(view::router())
        .merge(sse::router())
        .merge(session::router())
        .merge(admin::router(state.clone()));

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
