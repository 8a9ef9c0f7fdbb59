//! Scoreboard relay binary entrypoint wiring the backend client, live feed, REST and SSE layers.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use scoreboard_relay::{
    client::{AuthSession, HttpScoreboardApi},
    config::AppConfig,
    dto::validation::validate_public_id,
    routes,
    services::{sse_events, view_service},
    state::{AppState, SharedState},
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let session = Arc::new(AuthSession::new(AppConfig::access_token_from_env()));
    let api = HttpScoreboardApi::new(config.api_config(), session.clone())
        .context("building backend client")?;
    info!(api = %config.api_base_url, feed = %config.feed_url, "backend endpoints configured");

    let port = config.port;
    let initial_viewer = config.viewer_id.clone();
    let app_state = AppState::new(config, Arc::new(api), session.clone());

    tokio::spawn(sse_events::run_timer_ticker(app_state.clone()));
    tokio::spawn(watch_sign_out(app_state.clone()));
    if let Some(viewer_id) = initial_viewer {
        tokio::spawn(mount_initial(app_state.clone(), viewer_id));
    }

    let app = build_router(app_state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    view_service::unmount(&app_state).await;
    Ok(())
}

/// Mount the configured viewer without delaying the listener.
async fn mount_initial(state: SharedState, viewer_id: String) {
    if let Err(err) = validate_public_id(&viewer_id) {
        error!(viewer_id, error = %err, "configured viewer identifier rejected; nothing mounted");
        return;
    }
    let mounted = view_service::mount(&state, viewer_id).await;
    info!(
        viewer_id = mounted.viewer_id,
        feed_connected = mounted.feed_connected,
        "initial view mounted"
    );
}

/// Drop the open manage board whenever the backend signs the relay out.
async fn watch_sign_out(state: SharedState) {
    let mut signed_in = state.session().watcher();
    while signed_in.changed().await.is_ok() {
        let still_signed_in = *signed_in.borrow_and_update();
        if !still_signed_in && state.manage().write().await.take().is_some() {
            warn!("signed out; closing the open manage board");
        }
    }
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = match signal(SignalKind::terminate()) {
            Ok(term) => term,
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler; waiting for Ctrl+C only");
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
