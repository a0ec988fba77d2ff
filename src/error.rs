//! Error types for the Deep Intelligence SDK
//!
//! Every public API returns `Result<T, Error>` where Error is defined here.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the SDK
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Credential Errors
    // ============================================================================
    #[error("Missing credentials: no {field} could be resolved (explicit value, DEEPINT_{} or ~/.deepint.ini)", .field.to_uppercase())]
    MissingCredentials { field: String },

    #[error("Invalid config file '{}': {message}", .path.display())]
    InvalidConfigFile { path: PathBuf, message: String },

    // ============================================================================
    // Response Mapping Errors
    // ============================================================================
    #[error("Malformed {record} response: {message}")]
    MalformedResponse { record: String, message: String },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status} on {method} {url}: [{code}] {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
        method: String,
        url: String,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    // ============================================================================
    // Operation Errors
    // ============================================================================
    #[error("[{code}] {message}")]
    Validation { code: String, message: String },

    #[error("Task {task_id} failed: [{code}] {message}")]
    TaskFailed {
        task_id: String,
        code: String,
        message: String,
    },
}

impl Error {
    /// Create a missing credentials error
    pub fn missing_credentials(field: impl Into<String>) -> Self {
        Self::MissingCredentials {
            field: field.into(),
        }
    }

    /// Create an invalid config file error
    pub fn invalid_config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidConfigFile {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a malformed response error
    pub fn malformed(record: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            record: record.into(),
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            code: code.into(),
            message: message.into(),
        }
    }

    /// HTTP status of an API error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if an API call returned 404
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Check if this error is worth retrying.
    ///
    /// The SDK never retries on its own; this only classifies.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(e) => e.is_timeout() || e.is_connect(),
            Error::Timeout { .. } => true,
            Error::Api { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Result type alias for the SDK
pub type Result<T> = std::result::Result<T, Error>;
