//! # Storefront Testing
//!
//! Testing utilities and helpers for the storefront state container.
//!
//! This crate provides:
//! - A deterministic [`FixedClock`]
//! - [`ReducerTest`], a Given-When-Then harness for reducers
//! - Effect assertions and [`collect_actions`], which runs effect
//!   descriptions without a store and returns the actions they produce
//!
//! ## Example
//!
//! ```ignore
//! use storefront_testing::{ReducerTest, assertions};
//!
//! ReducerTest::new(CartReducer::new())
//!     .with_env(test_environment())
//!     .given_state(CartState::default())
//!     .when_action(CartAction::GetCarts)
//!     .then_state(|state| assert!(state.is_loading))
//!     .then_effects(|effects| assertions::assert_has_cancellable_effect(effects, "Cart/getCarts"))
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use storefront_core::environment::Clock;


pub use reducer_test::{assertions, collect_actions, ReducerTest};

/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use storefront_testing::mocks::FixedClock;
    /// use storefront_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(DateTime::<Utc>::UNIX_EPOCH + chrono::Duration::days(20_089))
    }
}

pub use mocks::{test_clock, FixedClock};
