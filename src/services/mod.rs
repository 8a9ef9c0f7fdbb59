/// Admin service for competition management.
pub mod admin_service;
/// Initial REST load of a mounted view.
pub mod bootstrap;
/// OpenAPI documentation generation.
pub mod documentation;
/// Merge loop applying feed messages to the view.
pub mod feed_service;
/// Health check service.
pub mod health_service;
/// Public service for read-only scoreboard projections.
pub mod public_service;
/// Admin score adjustment workflow.
pub mod score_service;
/// Backend sign-in and sign-out.
pub mod session_service;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
/// Mount and unmount of the live view.
pub mod view_service;
