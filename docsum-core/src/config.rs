use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Base URL used when neither configuration nor environment supplies one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Environment variable overriding the API base URL.
pub const BASE_URL_ENV: &str = "DOCSUM_API_BASE_URL";

/// Location of the summarization and conversion service.
///
/// Passed explicitly into the client constructors; there is no global.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        ApiConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Reads [`BASE_URL_ENV`], falling back to [`DEFAULT_BASE_URL`] when it
    /// is unset or blank.
    pub fn from_env() -> Self {
        ApiConfig::default().with_env_override()
    }

    /// Replaces the base URL with [`BASE_URL_ENV`] when that is set and not
    /// blank; otherwise keeps `self`.
    pub fn with_env_override(self) -> Self {
        match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => {
                debug!(env = BASE_URL_ENV, "API base URL taken from environment");
                ApiConfig::new(url.trim())
            }
            _ => self,
        }
    }

    /// Full URL of an endpoint below the base, e.g. `endpoint("summarize")`.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn trace_loaded(&self) {
        info!(base_url = %self.base_url, "Loaded API config");
    }
}
