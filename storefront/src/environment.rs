//! Dependency injection for the storefront reducers.
//!
//! Reducers never touch the network, the disk or the UI directly. Everything
//! an effect needs is reached through an [`Environment`], so tests swap the
//! whole outside world for [`MockEnvironment`](crate::mocks::MockEnvironment)
//! while the CLI runs on [`LiveEnvironment`].

use crate::clients::RestClient;
use crate::config::Config;
use crate::constants::routes;
use crate::error::StorefrontError;
use crate::providers::{
    AuthApi, CartApi, HistoryNavigator, Navigator, Notifier, ProductApi, ProfileApi,
    TracingNotifier,
};
use crate::storage::{FileStorage, KeyValueStorage, Storage};
use std::time::Duration;
use storefront_core::environment::{Clock, SystemClock};

/// The capabilities available to storefront effects.
///
/// Environments are cloned into every effect, so implementations keep their
/// clones cheap (shared handles, not owned resources).
pub trait Environment: Clone + Send + Sync + 'static {
    /// Authentication endpoints.
    type Auth: AuthApi;
    /// Product endpoints.
    type Products: ProductApi;
    /// Cart endpoints.
    type Carts: CartApi;
    /// Profile endpoints.
    type Profiles: ProfileApi;
    /// Backend of the persistent storage.
    type Backend: KeyValueStorage;
    /// Navigation.
    type Navigator: Navigator + Clone;
    /// User notifications.
    type Notifier: Notifier + Clone;

    /// Authentication endpoints.
    fn auth_api(&self) -> &Self::Auth;

    /// Product endpoints.
    fn product_api(&self) -> &Self::Products;

    /// Cart endpoints.
    fn cart_api(&self) -> &Self::Carts;

    /// Profile endpoints.
    fn profile_api(&self) -> &Self::Profiles;

    /// Persistent storage holding the auth token.
    fn storage(&self) -> &Storage<Self::Backend>;

    /// Navigation.
    fn navigator(&self) -> &Self::Navigator;

    /// User notifications.
    fn notifier(&self) -> &Self::Notifier;

    /// Time source for notification timestamps.
    fn clock(&self) -> &dyn Clock;

    /// How long notifications stay visible.
    fn toast_duration(&self) -> Duration;
}

/// Production environment: HTTP API, file-backed storage, in-process
/// navigation history and log-based notifications.
#[derive(Debug, Clone)]
pub struct LiveEnvironment {
    client: RestClient,
    storage: Storage<FileStorage>,
    navigator: HistoryNavigator,
    notifier: TracingNotifier,
    clock: SystemClock,
    toast_duration: Duration,
}

impl LiveEnvironment {
    /// Assemble an environment from its parts.
    #[must_use]
    pub const fn new(
        client: RestClient,
        storage: Storage<FileStorage>,
        navigator: HistoryNavigator,
        toast_duration: Duration,
    ) -> Self {
        Self {
            client,
            storage,
            navigator,
            notifier: TracingNotifier,
            clock: SystemClock,
            toast_duration,
        }
    }

    /// Build the environment described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Client`] if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, StorefrontError> {
        tracing::debug!(
            api_url = %config.api_url,
            storage = %config.storage_path.display(),
            "Building live environment"
        );

        Ok(Self::new(
            RestClient::from_config(config)?,
            Storage::new(FileStorage::new(&config.storage_path)),
            HistoryNavigator::new(routes::HOME),
            config.toast_duration,
        ))
    }
}

impl Environment for LiveEnvironment {
    type Auth = RestClient;
    type Products = RestClient;
    type Carts = RestClient;
    type Profiles = RestClient;
    type Backend = FileStorage;
    type Navigator = HistoryNavigator;
    type Notifier = TracingNotifier;

    fn auth_api(&self) -> &RestClient {
        &self.client
    }

    fn product_api(&self) -> &RestClient {
        &self.client
    }

    fn cart_api(&self) -> &RestClient {
        &self.client
    }

    fn profile_api(&self) -> &RestClient {
        &self.client
    }

    fn storage(&self) -> &Storage<FileStorage> {
        &self.storage
    }

    fn navigator(&self) -> &HistoryNavigator {
        &self.navigator
    }

    fn notifier(&self) -> &TracingNotifier {
        &self.notifier
    }

    fn clock(&self) -> &dyn Clock {
        &self.clock
    }

    fn toast_duration(&self) -> Duration {
        self.toast_duration
    }
}
