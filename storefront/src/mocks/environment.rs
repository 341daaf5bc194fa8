//! Fully mocked environment.

use super::{
    MockAuthApi, MockCartApi, MockProductApi, MockProfileApi, RecordingNavigator,
    RecordingNotifier,
};
use crate::constants::notifications;
use crate::environment::Environment;
use crate::storage::{MemoryStorage, Storage};
use std::time::Duration;
use storefront_core::environment::Clock;
use storefront_testing::mocks::{test_clock, FixedClock};

/// Environment made of mocks only.
///
/// Fields are public so tests can script the APIs and inspect what effects
/// did. Clones share every mock.
#[derive(Debug, Clone)]
pub struct MockEnvironment {
    /// Authentication endpoints.
    pub auth: MockAuthApi,
    /// Product endpoints.
    pub products: MockProductApi,
    /// Cart endpoints.
    pub carts: MockCartApi,
    /// Profile endpoints.
    pub profiles: MockProfileApi,
    /// In-memory persistent storage.
    pub storage: Storage<MemoryStorage>,
    /// Recording navigator.
    pub navigator: RecordingNavigator,
    /// Recording notifier.
    pub notifier: RecordingNotifier,
    /// Fixed clock (2025-01-01).
    pub clock: FixedClock,
}

impl MockEnvironment {
    /// Environment with default mocks and empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self {
            auth: MockAuthApi::new(),
            products: MockProductApi::new(),
            carts: MockCartApi::new(),
            profiles: MockProfileApi::new(),
            storage: Storage::new(MemoryStorage::new()),
            navigator: RecordingNavigator::default(),
            notifier: RecordingNotifier::new(),
            clock: test_clock(),
        }
    }

    /// Replace the authentication mock.
    #[must_use]
    pub fn with_auth(mut self, auth: MockAuthApi) -> Self {
        self.auth = auth;
        self
    }

    /// Replace the product mock.
    #[must_use]
    pub fn with_products(mut self, products: MockProductApi) -> Self {
        self.products = products;
        self
    }

    /// Pre-populate the persisted token.
    #[must_use]
    pub fn with_persisted_token(self, token: &str) -> Self {
        // MemoryStorage only fails on a poisoned lock
        let _ = self.storage.save_token(token);
        self
    }

    /// The persisted token, if any.
    #[must_use]
    pub fn stored_token(&self) -> Option<String> {
        self.storage.load_token().ok().flatten()
    }
}

impl Default for MockEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for MockEnvironment {
    type Auth = MockAuthApi;
    type Products = MockProductApi;
    type Carts = MockCartApi;
    type Profiles = MockProfileApi;
    type Backend = MemoryStorage;
    type Navigator = RecordingNavigator;
    type Notifier = RecordingNotifier;

    fn auth_api(&self) -> &MockAuthApi {
        &self.auth
    }

    fn product_api(&self) -> &MockProductApi {
        &self.products
    }

    fn cart_api(&self) -> &MockCartApi {
        &self.carts
    }

    fn profile_api(&self) -> &MockProfileApi {
        &self.profiles
    }

    fn storage(&self) -> &Storage<MemoryStorage> {
        &self.storage
    }

    fn navigator(&self) -> &RecordingNavigator {
        &self.navigator
    }

    fn notifier(&self) -> &RecordingNotifier {
        &self.notifier
    }

    fn clock(&self) -> &dyn Clock {
        &self.clock
    }

    fn toast_duration(&self) -> Duration {
        Duration::from_millis(notifications::DEFAULT_DURATION_MS)
    }
}
