//! Error types for the storefront.
//!
//! Request failures never escape the store: effects turn an [`ApiError`] into
//! its display string and carry it in a failure action. The remaining errors
//! surface from the facade, the router and configuration.

use storefront_runtime::StoreError;
use thiserror::Error;

/// Result type alias for storefront operations.
pub type Result<T> = std::result::Result<T, StorefrontError>;

/// Failure of a single REST request.
///
/// The `Display` output is what ends up in a feature's `error` field.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response (DNS, TLS, connection reset...).
    #[error("Request failed: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    ///
    /// `message` is the response body when there was one, otherwise
    /// `"<status> <reason>"`.
    #[error("{message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Human-readable message
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("Invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Build a status error, preferring the response body as the message.
    #[must_use]
    pub fn status(status: u16, reason: Option<&str>, body: &str) -> Self {
        let body = body.trim();
        let message = if body.is_empty() {
            match reason {
                Some(reason) => format!("{status} {reason}"),
                None => status.to_string(),
            }
        } else {
            body.to_string()
        };

        Self::Status { status, message }
    }
}

/// Failure of the persistent key-value storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value or the backing file is not valid JSON.
    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Another thread panicked while holding the storage lock.
    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Navigation failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouterError {
    /// No route matches the path.
    #[error("No route matches `{0}`")]
    NotFound(String),

    /// Guards kept redirecting without settling on a route.
    #[error("Too many redirects while navigating to `{path}` ({hops} hops)")]
    RedirectLoop {
        /// The path navigation started from
        path: String,
        /// Number of redirects followed
        hops: usize,
    },
}

/// Invalid configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The API base URL is empty.
    #[error("API URL must not be empty")]
    EmptyApiUrl,

    /// The API base URL is not an http(s) URL.
    #[error("API URL must start with http:// or https://, got `{0}`")]
    InvalidApiUrl(String),

    /// A numeric variable could not be parsed.
    #[error("Invalid value for {name}: `{value}`")]
    InvalidNumber {
        /// Environment variable name
        name: &'static str,
        /// The raw value
        value: String,
    },
}

/// Top-level error of the storefront facade.
#[derive(Debug, Error)]
pub enum StorefrontError {
    // ═══════════════════════════════════════════════════════════
    // Request Errors
    // ═══════════════════════════════════════════════════════════

    /// A request ended in its failure action.
    #[error("{0}")]
    Request(String),

    /// Form fields failed validation; nothing was dispatched.
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<&'static str>),

    /// The operation needs a loaded entity that is not there.
    #[error("{0} not found")]
    NotFound(String),

    // ═══════════════════════════════════════════════════════════
    // Infrastructure Errors
    // ═══════════════════════════════════════════════════════════

    /// Store runtime error (timeout, shutdown).
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Storage error.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Navigation error.
    #[error(transparent)]
    Router(#[from] RouterError),

    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// HTTP client construction failed.
    #[error("HTTP client error: {0}")]
    Client(String),
}
