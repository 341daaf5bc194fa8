//! # Storefront Core
//!
//! Core traits and types for the storefront state container.
//!
//! The storefront keeps all client-visible state in one tree that only changes
//! through dispatched actions. This crate provides the vocabulary for that loop:
//!
//! - **State**: Feature state owned by one functional area (auth, product, cart, profile)
//! - **Action**: Named, immutable description of intent with a fixed payload
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected dependencies via traits
//!
//! ## Architecture Principles
//!
//! - Functional Core, Imperative Shell
//! - Unidirectional Data Flow
//! - Explicit Effects (no hidden I/O)
//! - Dependency Injection via Environment
//!
//! ## Example
//!
//! ```
//! use storefront_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct CartBadge {
//!     count: u32,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum CartBadgeAction {
//!     ItemAdded,
//!     Cleared,
//! }
//!
//! struct CartBadgeReducer;
//!
//! impl Reducer for CartBadgeReducer {
//!     type State = CartBadge;
//!     type Action = CartBadgeAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CartBadge,
//!         action: CartBadgeAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<CartBadgeAction>; 4]> {
//!         match action {
//!             CartBadgeAction::ItemAdded => state.count += 1,
//!             CartBadgeAction::Cleared => state.count = 0,
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! let mut state = CartBadge::default();
//! let _ = CartBadgeReducer.reduce(&mut state, CartBadgeAction::ItemAdded, &());
//! assert_eq!(state.count, 1);
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use smallvec::{smallvec, SmallVec};

pub use effect::{Effect, EffectId};
pub use reducer::Reducer;

/// Reducer composition utilities
pub mod composition;

/// Declarative macros for building effects
pub mod effect_macros;

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all state transitions and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for state transitions
    ///
    /// # Type Parameters
    ///
    /// - `State`: The feature state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for ProductReducer {
    ///     type State = ProductState;
    ///     type Action = ProductAction;
    ///     type Environment = ();
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut ProductState,
    ///         action: ProductAction,
    ///         env: &(),
    ///     ) -> SmallVec<[Effect<ProductAction>; 4]> {
    ///         match action {
    ///             ProductAction::LoadProducts => {
    ///                 state.is_loading = true;
    ///                 smallvec![Effect::None]
    ///             }
    ///             _ => smallvec![Effect::None],
    ///         }
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Updates state in place (the runtime holds the write lock, so no
        ///    reader observes a partially applied transition)
        /// 2. Returns effect descriptions to be executed
        ///
        /// Actions a reducer does not recognize must leave state unchanged.
        ///
        /// # Arguments
        ///
        /// - `state`: Mutable reference to current state
        /// - `action`: The action to process
        /// - `env`: Reference to injected dependencies
        ///
        /// # Returns
        ///
        /// Effects to be executed by the runtime
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution) and can be mapped and cancelled.
pub mod effect {
    use std::borrow::Cow;
    use std::future::Future;
    use std::pin::Pin;

    /// Identifier grouping cancellable effects.
    ///
    /// Starting a cancellable effect cancels every in-flight effect that was
    /// started under the same identifier (latest request wins).
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct EffectId(Cow<'static, str>);

    impl EffectId {
        /// Create an identifier from a static name (usually an action type)
        #[must_use]
        pub const fn new(id: &'static str) -> Self {
            Self(Cow::Borrowed(id))
        }

        /// The identifier as a string slice
        #[must_use]
        pub fn as_str(&self) -> &str {
            &self.0
        }
    }

    impl From<&'static str> for EffectId {
        fn from(id: &'static str) -> Self {
            Self::new(id)
        }
    }

    impl From<String> for EffectId {
        fn from(id: String) -> Self {
            Self(Cow::Owned(id))
        }
    }

    impl std::fmt::Display for EffectId {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by the Store runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),

        /// Run `effect` under `id`, cancelling whatever still runs under the same id
        Cancellable {
            /// Cancellation group
            id: EffectId,
            /// The effect to run
            effect: Box<Effect<Action>>,
        },
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
                Effect::Cancellable { id, effect } => f
                    .debug_struct("Effect::Cancellable")
                    .field("id", id)
                    .field("effect", effect)
                    .finish(),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Make this effect cancellable under `id`
        #[must_use]
        pub fn cancellable(self, id: impl Into<EffectId>) -> Effect<Action> {
            Effect::Cancellable {
                id: id.into(),
                effect: Box::new(self),
            }
        }

        /// Transform every action this effect may produce.
        ///
        /// Used to lift a feature's effects into the application action type.
        #[must_use]
        pub fn map<B, F>(self, f: F) -> Effect<B>
        where
            F: FnOnce(Action) -> B + Send + 'static,
            Action: 'static,
            B: 'static,
        {
            match self {
                Effect::None => Effect::None,
                Effect::Future(fut) => Effect::Future(Box::pin(async move { fut.await.map(f) })),
                Effect::Cancellable { id, effect } => Effect::Cancellable {
                    id,
                    effect: Box::new(effect.map(f)),
                },
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall-clock time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
