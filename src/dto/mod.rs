//! Request and response types of the local API and the backend wire formats.

/// Local admin and view-control payloads.
pub mod admin;
/// Backend competition, manage and sign-in shapes.
pub mod competition;
/// Streaming feed messages.
pub mod feed;
/// Health check payload.
pub mod health;
/// Server-Sent Events payloads.
pub mod sse;
/// Identifier validation helpers.
pub mod validation;
/// Projected scoreboard served to displays.
pub mod view;
