//! HTTP implementations of the REST resource traits.
//!
//! A single [`RestClient`] talks to the storefront API and implements
//! [`AuthApi`](crate::providers::AuthApi), [`ProductApi`](crate::providers::ProductApi),
//! [`CartApi`](crate::providers::CartApi) and [`ProfileApi`](crate::providers::ProfileApi),
//! one resource per submodule.

mod auth;
mod carts;
mod products;
mod profiles;

use crate::config::Config;
use crate::error::{ApiError, StorefrontError};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Storefront REST API client.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct RestClient {
    client: Client,
    base_url: Arc<str>,
}

impl RestClient {
    /// Create a client for `base_url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Client`] if the HTTP client cannot be built
    /// (e.g. no TLS backend).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, StorefrontError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StorefrontError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        })
    }

    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// See [`RestClient::new`].
    pub fn from_config(config: &Config) -> Result<Self, StorefrontError> {
        Self::new(&config.api_url, config.request_timeout)
    }

    /// The API base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        tracing::debug!(path, "GET");

        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        decode(response).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!(path, "POST");

        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();

    if status.is_success() {
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    } else {
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), "Request rejected");
        Err(ApiError::status(status.as_u16(), status.canonical_reason(), &body))
    }
}
