//! Client configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const SESSION_DIR: &str = ".cinephile";
const SESSION_FILE: &str = "session.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid API URL '{0}': expected http:// or https://")]
    InvalidApiUrl(String),

    #[error("invalid value for {key}: '{value}'")]
    InvalidNumber { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// REST base address, without trailing slash (e.g. `http://localhost:8080/api`).
    pub api_url: String,
    /// File backing the persisted session.
    pub session_file: PathBuf,
    pub connect_timeout_secs: u64,
    /// Whole-request timeout. `None` leaves requests unbounded.
    pub request_timeout_secs: Option<u64>,
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `CINEPHILE_API_URL`: default `http://localhost:8080/api`
    /// - `CINEPHILE_SESSION_FILE`: default `$HOME/.cinephile/session.json`
    /// - `CINEPHILE_CONNECT_TIMEOUT_SECS`: default 10
    /// - `CINEPHILE_REQUEST_TIMEOUT_SECS`: unset means no timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the URL scheme is unsupported or a number fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an injectable variable source.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL scheme is unsupported or a number fails to parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = parse_api_url(lookup("CINEPHILE_API_URL").as_deref().unwrap_or(DEFAULT_API_URL))?;
        let session_file = lookup("CINEPHILE_SESSION_FILE")
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| default_session_file(lookup("HOME")), PathBuf::from);
        let connect_timeout_secs = parse_u64("CINEPHILE_CONNECT_TIMEOUT_SECS", lookup("CINEPHILE_CONNECT_TIMEOUT_SECS"))?
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS);
        let request_timeout_secs = parse_u64("CINEPHILE_REQUEST_TIMEOUT_SECS", lookup("CINEPHILE_REQUEST_TIMEOUT_SECS"))?;

        Ok(Self { api_url, session_file, connect_timeout_secs, request_timeout_secs })
    }

    /// Replace the API base URL, applying the same validation as the env path.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL scheme is unsupported.
    pub fn with_api_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.api_url = parse_api_url(raw)?;
        Ok(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            session_file: PathBuf::from(SESSION_DIR).join(SESSION_FILE),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            request_timeout_secs: None,
        }
    }
}

fn parse_api_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_owned())
    } else {
        Err(ConfigError::InvalidApiUrl(raw.to_owned()))
    }
}

fn parse_u64(key: &'static str, raw: Option<String>) -> Result<Option<u64>, ConfigError> {
    let Some(value) = raw.filter(|v| !v.trim().is_empty()) else {
        return Ok(None);
    };
    value
        .trim()
        .parse::<u64>()
        .map(Some)
        .map_err(|_| ConfigError::InvalidNumber { key, value })
}

fn default_session_file(home: Option<String>) -> PathBuf {
    match home.filter(|h| !h.is_empty()) {
        Some(home) => PathBuf::from(home).join(SESSION_DIR).join(SESSION_FILE),
        None => PathBuf::from(SESSION_DIR).join(SESSION_FILE),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
