//! Error types returned by the backend client.

use reqwest::StatusCode;
use thiserror::Error;

/// Convenient result alias returning [`ApiError`] failures.
pub type ApiResult<T> = Result<T, ApiError>;

/// Closed set of failures a backend call can produce. Call sites match on the kind.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, TLS, connection reset, ...).
    #[error("request to `{path}` failed")]
    Network {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// The backend answered with a status this call does not accept.
    #[error("backend returned status {status} for `{path}`")]
    Server { path: String, status: StatusCode },
    /// The response body did not match the expected shape.
    #[error("failed to decode backend response for `{path}`")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// HTTP status of a server-side failure.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Failures while building [`HttpScoreboardApi`](crate::client::HttpScoreboardApi).
#[derive(Debug, Error)]
pub enum ClientBuildError {
    /// The configured base URL is unusable.
    #[error("invalid backend base URL `{url}`")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// reqwest refused the client settings.
    #[error("failed to build HTTP client")]
    Http(#[from] reqwest::Error),
}

/// Failures while opening the streaming feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The configured feed URL cannot be parsed.
    #[error("invalid feed URL `{url}`")]
    InvalidUrl {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// The WebSocket handshake did not finish in time.
    #[error("feed `{url}` did not complete the handshake within {after:?}")]
    Timeout { url: String, after: std::time::Duration },
    /// The WebSocket handshake failed.
    #[error("failed to connect to feed `{url}`")]
    Connect {
        url: String,
        #[source]
        source: tokio_tungstenite::tungstenite::Error,
    },
}
