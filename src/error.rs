//! Error types for company-code-resolver
//!
//! Two layers of errors live here:
//! - [`Error`] is returned by construction and validation paths (config, facade setup,
//!   budget pre-check). Batch execution itself never returns it.
//! - [`LookupError`] describes why a single remote call failed. It is consumed by the
//!   classifier and turned into an `ERROR` result; it never escapes a lookup.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for company-code-resolver operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for company-code-resolver
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "batch_deadline")
        key: Option<String>,
    },

    /// HTTP client could not be built
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Lookup service URL is invalid
    #[error("invalid lookup URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Requested concurrency is not a positive integer
    #[error("invalid concurrency {0}: must be at least 1")]
    InvalidConcurrency(usize),

    /// The budget pre-check predicts the batch cannot finish before its deadline
    #[error("estimated batch duration {estimated:?} exceeds budget {budget:?}")]
    BudgetExceeded {
        /// Estimated wall-clock duration of the batch
        estimated: Duration,
        /// Deadline the batch must finish within
        budget: Duration,
    },
}

impl Error {
    /// Shorthand for a configuration error on a specific key
    pub(crate) fn config(key: &str, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.to_string()),
        }
    }

    /// Machine-readable error code, stable across releases
    ///
    /// Callers that surface errors in HTTP responses use this as the `code` field.
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Network(_) => "network_error",
            Error::Serialization(_) => "serialization_error",
            Error::InvalidUrl(_) => "invalid_url",
            Error::InvalidConcurrency(_) => "invalid_concurrency",
            Error::BudgetExceeded { .. } => "budget_exceeded",
        }
    }
}

/// Why a single lookup call failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// Connection refused, DNS failure, reset, or another transport problem
    #[error("transport error: {0}")]
    Transport(String),

    /// The request did not complete in time
    #[error("lookup timed out after {0:?}")]
    Timeout(Duration),

    /// The service answered with a non-success status
    #[error("lookup service returned status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, truncated
        body: String,
    },

    /// The response body was not valid JSON
    #[error("malformed lookup response: {0}")]
    Malformed(String),
}

impl LookupError {
    /// Build a LookupError from a reqwest error, separating timeouts from other failures
    pub(crate) fn from_reqwest(err: &reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            LookupError::Timeout(timeout)
        } else if let Some(status) = err.status() {
            LookupError::Status {
                status: status.as_u16(),
                body: String::new(),
            }
        } else {
            LookupError::Transport(err.to_string())
        }
    }
}
