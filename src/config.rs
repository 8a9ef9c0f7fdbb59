//! Application-level configuration loading: backend endpoints, viewer, and view tuning.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

use crate::{client::ApiConfig, state::clock::DEFAULT_URGENT_THRESHOLD_SECS};

/// Default location on disk where the relay looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "SCOREBOARD_RELAY_CONFIG_PATH";
const API_BASE_URL_ENV: &str = "SCOREBOARD_API_BASE_URL";
const FEED_URL_ENV: &str = "SCOREBOARD_FEED_URL";
const VIEWER_ID_ENV: &str = "SCOREBOARD_VIEWER_ID";
const ACCESS_TOKEN_ENV: &str = "SCOREBOARD_ACCESS_TOKEN";

const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/";
const DEFAULT_FEED_URL: &str = "ws://localhost:8081/ws/scoreboard";
const DEFAULT_PORT: u16 = 8090;
const DEFAULT_FEED_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Root of the backend REST API.
    pub api_base_url: String,
    /// Streaming feed endpoint; the viewer identifier is appended as a query parameter.
    pub feed_url: String,
    /// Viewer identifier mounted at startup, if any.
    pub viewer_id: Option<String>,
    /// Page size requested from the public competition list.
    pub list_page_size: u32,
    /// Remaining seconds under which the timer is flagged as urgent.
    pub urgent_threshold_secs: i64,
    /// Capacity of the channel between the feed reader and the merge loop.
    pub feed_buffer: usize,
    /// Upper bound on opening the feed: TCP connect plus WebSocket handshake.
    pub feed_connect_timeout_secs: u64,
    /// Per-request timeout for REST calls. Unset means no timeout.
    pub request_timeout_secs: Option<u64>,
    /// Port of the local HTTP surface.
    pub port: u16,
}

impl AppConfig {
    /// Load the configuration from disk, then apply environment overrides.
    pub fn load() -> Self {
        let mut config = Self::from_file();
        config.apply_env();
        config
    }

    fn from_file() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<Self>(&contents) {
                Ok(config) => {
                    info!(path = %path.display(), "loaded relay config");
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    fn apply_env(&mut self) {
        if let Some(value) = non_empty_env(API_BASE_URL_ENV) {
            self.api_base_url = value;
        }
        if let Some(value) = non_empty_env(FEED_URL_ENV) {
            self.feed_url = value;
        }
        if let Some(value) = non_empty_env(VIEWER_ID_ENV) {
            self.viewer_id = Some(value);
        }
        if let Some(port) = env::var("PORT")
            .or_else(|_| env::var("SERVER_PORT"))
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
        {
            self.port = port;
        }
    }

    /// Settings for the REST client.
    pub fn api_config(&self) -> ApiConfig {
        let config = ApiConfig::new(self.api_base_url.clone());
        match self.request_timeout_secs {
            Some(secs) => config.with_timeout(Duration::from_secs(secs)),
            None => config,
        }
    }

    /// How long a mount waits for the feed handshake before giving up on live updates.
    pub fn feed_connect_timeout(&self) -> Duration {
        Duration::from_secs(self.feed_connect_timeout_secs)
    }

    /// Bearer token handed over through the environment. Never read from the config file.
    pub fn access_token_from_env() -> Option<String> {
        non_empty_env(ACCESS_TOKEN_ENV)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            feed_url: DEFAULT_FEED_URL.into(),
            viewer_id: None,
            list_page_size: 30,
            urgent_threshold_secs: DEFAULT_URGENT_THRESHOLD_SECS,
            feed_buffer: 32,
            feed_connect_timeout_secs: DEFAULT_FEED_CONNECT_TIMEOUT_SECS,
            request_timeout_secs: None,
            port: DEFAULT_PORT,
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
