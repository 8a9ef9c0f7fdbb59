//! Library crate for scoreboard-relay, exposing modules for binaries and integration tests.

/// Backend REST client, session credential and streaming feed.
pub mod client;
/// Runtime configuration loading.
pub mod config;
/// Wire and API data transfer objects.
pub mod dto;
/// Service and HTTP error types.
pub mod error;
/// Axum routers for the local HTTP surface.
pub mod routes;
/// Workflows behind the routes and background tasks.
pub mod services;
/// Shared application state and the pure view logic.
pub mod state;
