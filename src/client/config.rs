//! REST client settings.

use std::time::Duration;

/// Runtime configuration describing how to reach the scoreboard backend.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Root URL; API paths are appended below it.
    pub base_url: String,
    /// Per-request timeout; `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

impl ApiConfig {
    /// Construct a configuration from an explicit base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout: None,
        }
    }

    /// Give up on requests that take longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }
}
