//! Error taxonomy shared by the API client and the services built on it.
//!
//! DESIGN
//! ======
//! Transport failures, 4xx and 5xx responses stay distinct all the way up to
//! the caller. Services never recover; the consumer decides what to show.
//! `AuthError` narrows 4xx responses into the auth-specific meaning of each
//! endpoint (bad credentials, rejected payload, dead reset token).

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;

use crate::config::ConfigError;
use crate::storage::StorageError;

/// Grepable error code for logs and CLI output.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;
}

// =============================================================================
// API ERRORS
// =============================================================================

/// Failure of a single REST call.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No response was received (connect, DNS, TLS, timeout, body read).
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a 4xx status.
    #[error("client error {status}: {message}")]
    Client { status: u16, message: String },

    /// The server answered with a 5xx status.
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },

    /// A 2xx body did not match the expected shape.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// The request could not be assembled (bad URL, header or body).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// HTTP status carried by the error, if the server responded at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Client { status, .. } | Self::Server { status, .. } => Some(*status),
            Self::Network(_) | Self::Decode(_) | Self::InvalidRequest(_) => None,
        }
    }

    /// Classify a non-success status into the client or server bucket.
    #[must_use]
    pub fn from_status(status: u16, message: String) -> Self {
        if (500..=599).contains(&status) {
            Self::Server { status, message }
        } else {
            Self::Client { status, message }
        }
    }
}

impl ErrorCode for ApiError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Network(_) => "E_NETWORK",
            Self::Client { .. } => "E_CLIENT",
            Self::Server { .. } => "E_SERVER",
            Self::Decode(_) => "E_DECODE",
            Self::InvalidRequest(_) => "E_INVALID_REQUEST",
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_builder() {
            Self::InvalidRequest(error.to_string())
        } else if error.is_decode() {
            Self::Decode(error.to_string())
        } else {
            Self::Network(error.to_string())
        }
    }
}

// =============================================================================
// AUTH ERRORS
// =============================================================================

/// Failure of an auth operation, after endpoint-specific 4xx mapping.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The server rejected the submitted payload (duplicate email, bad format).
    #[error("validation failed: {0}")]
    ValidationError(String),

    /// Login was refused.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The password-reset token was unknown, used or expired.
    #[error("invalid or expired reset token: {0}")]
    InvalidOrExpiredToken(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("auth response decode failed: {0}")]
    Decode(String),

    /// The session could not be persisted after a successful auth call.
    #[error("session storage failed: {0}")]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Map a transport/server failure shared by every auth endpoint.
    ///
    /// `on_client` decides what a 4xx means for the calling endpoint.
    pub(crate) fn from_api(error: ApiError, on_client: impl FnOnce(String) -> Self) -> Self {
        match error {
            ApiError::Client { message, .. } => on_client(message),
            ApiError::Server { status, message } => Self::Server { status, message },
            ApiError::Network(message) => Self::Network(message),
            ApiError::Decode(message) | ApiError::InvalidRequest(message) => Self::Decode(message),
        }
    }
}

impl ErrorCode for AuthError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ValidationError(_) => "E_VALIDATION",
            Self::InvalidCredentials => "E_INVALID_CREDENTIALS",
            Self::InvalidOrExpiredToken(_) => "E_INVALID_TOKEN",
            Self::Network(_) => "E_NETWORK",
            Self::Server { .. } => "E_SERVER",
            Self::Decode(_) => "E_DECODE",
            Self::Storage(_) => "E_STORAGE",
        }
    }
}

impl ErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "E_STORAGE_IO",
            Self::Corrupt { .. } => "E_STORAGE_CORRUPT",
            Self::Poisoned => "E_STORAGE_POISONED",
        }
    }
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidApiUrl(_) => "E_CONFIG_URL",
            Self::InvalidNumber { .. } => "E_CONFIG_NUMBER",
        }
    }
}

/// Extract a human-readable message from an error response body.
///
/// Spring-style JSON bodies carry `message` (or `error`); anything else is
/// returned as trimmed text.
#[must_use]
pub fn error_message_from_body(body: &str) -> String {
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error"] {
            if let Some(message) = map.get(key).and_then(serde_json::Value::as_str) {
                return message.to_owned();
            }
        }
    }
    body.trim().to_owned()
}
