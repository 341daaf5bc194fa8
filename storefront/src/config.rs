//! Storefront configuration.
//!
//! The only setting the storefront strictly needs is the API base URL; the
//! rest tune the CLI session. Values come from `STOREFRONT_*` environment
//! variables (optionally via a `.env` file) or from the builders below.

use crate::constants::notifications;
use crate::error::ConfigError;
use crate::types::UserId;
use std::path::PathBuf;
use std::time::Duration;

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "https://fakestoreapi.com";

/// Default location of the file-backed token storage.
pub const DEFAULT_STORAGE_PATH: &str = ".storefront/storage.json";

/// Storefront configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the REST API, without trailing slash.
    pub api_url: String,

    /// File backing the persistent key-value storage.
    ///
    /// Default: `.storefront/storage.json`
    pub storage_path: PathBuf,

    /// How long a request may take before the facade stops waiting for its
    /// terminal action.
    ///
    /// Default: 30 seconds
    pub request_timeout: Duration,

    /// How long notifications stay visible.
    ///
    /// Default: 3 seconds
    pub toast_duration: Duration,

    /// User the cart and profile commands act for.
    ///
    /// Default: 1
    pub user_id: UserId,
}

impl Config {
    /// Create a configuration for `api_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the URL is empty or not http(s).
    pub fn new(api_url: impl Into<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: validate_api_url(api_url.into())?,
            ..Self::default()
        })
    }

    /// Load configuration from the process environment.
    ///
    /// A `.env` file in the working directory is read first if present.
    /// Unset variables fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Missing .env is fine
        let _ = dotenvy::dotenv();

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable holds an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_url = lookup("STOREFRONT_API_URL").unwrap_or(defaults.api_url);
        let storage_path = lookup("STOREFRONT_STORAGE_PATH")
            .map_or(defaults.storage_path, PathBuf::from);
        let request_timeout = parse_number(&lookup, "STOREFRONT_REQUEST_TIMEOUT_SECS")?
            .map_or(defaults.request_timeout, Duration::from_secs);
        let toast_duration = parse_number(&lookup, "STOREFRONT_TOAST_DURATION_MS")?
            .map_or(defaults.toast_duration, Duration::from_millis);
        let user_id = parse_number(&lookup, "STOREFRONT_USER_ID")?.unwrap_or(defaults.user_id);

        Ok(Self {
            api_url: validate_api_url(api_url)?,
            storage_path,
            request_timeout,
            toast_duration,
            user_id,
        })
    }

    /// Set the storage file.
    #[must_use]
    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = path.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the notification duration.
    #[must_use]
    pub const fn with_toast_duration(mut self, duration: Duration) -> Self {
        self.toast_duration = duration;
        self
    }

    /// Set the acting user.
    #[must_use]
    pub const fn with_user_id(mut self, user_id: UserId) -> Self {
        self.user_id = user_id;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            request_timeout: Duration::from_secs(30),
            toast_duration: Duration::from_millis(notifications::DEFAULT_DURATION_MS),
            user_id: 1,
        }
    }
}

fn validate_api_url(url: String) -> Result<String, ConfigError> {
    let url = url.trim().trim_end_matches('/').to_string();

    if url.is_empty() {
        return Err(ConfigError::EmptyApiUrl);
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::InvalidApiUrl(url));
    }

    Ok(url)
}

fn parse_number<F>(lookup: &F, name: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidNumber { name, value })
        })
        .transpose()
}
