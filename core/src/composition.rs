//! Reducer composition utilities
//!
//! This module provides utilities for composing reducers in various ways:
//! - **`combine_reducers`**: Run multiple reducers on the same state/action
//! - **`pullback`**: Lift a feature reducer into the application's state and action
//!
//! # Examples
//!
//! ## Combining Reducers
//!
//! ```
//! use storefront_core::{Reducer, effect::Effect, smallvec, SmallVec};
//! use storefront_core::composition::combine_reducers;
//!
//! #[derive(Clone, Default)]
//! struct AppState {
//!     visits: u32,
//!     last_path: String,
//! }
//!
//! #[derive(Clone)]
//! enum AppAction {
//!     Visit(String),
//! }
//!
//! struct VisitCounter;
//! struct PathTracker;
//!
//! impl Reducer for VisitCounter {
//!     type State = AppState;
//!     type Action = AppAction;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut AppState, _action: AppAction, _env: &()) -> SmallVec<[Effect<AppAction>; 4]> {
//!         state.visits += 1;
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! impl Reducer for PathTracker {
//!     type State = AppState;
//!     type Action = AppAction;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut AppState, action: AppAction, _env: &()) -> SmallVec<[Effect<AppAction>; 4]> {
//!         let AppAction::Visit(path) = action;
//!         state.last_path = path;
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! let combined = combine_reducers(vec![Box::new(VisitCounter), Box::new(PathTracker)]);
//!
//! let mut state = AppState::default();
//! let _ = combined.reduce(&mut state, AppAction::Visit("/cart".to_string()), &());
//! assert_eq!(state.visits, 1);
//! assert_eq!(state.last_path, "/cart");
//! ```

use crate::effect::Effect;
use crate::reducer::Reducer;
use smallvec::SmallVec;

/// Combines multiple reducers that operate on the same state and action types.
///
/// Each reducer is run in sequence, and all effects are collected and concatenated.
#[must_use]
pub fn combine_reducers<S, A, E>(
    reducers: Vec<Box<dyn Reducer<State = S, Action = A, Environment = E> + Send + Sync>>,
) -> CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    CombinedReducer { reducers }
}

/// A combined reducer that runs multiple reducers in sequence.
///
/// Created by [`combine_reducers`].
pub struct CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    reducers: Vec<Box<dyn Reducer<State = S, Action = A, Environment = E> + Send + Sync>>,
}

impl<S, A, E> Reducer for CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let mut all_effects = SmallVec::new();

        for reducer in &self.reducers {
            let effects = reducer.reduce(state, action.clone(), env);
            all_effects.extend(effects);
        }

        all_effects
    }
}

/// Lifts a feature reducer into a parent state and action.
///
/// - `state` focuses the parent state onto the feature's slice
/// - `extract` returns the feature action carried by a parent action, if any
/// - `embed` wraps feature actions produced by effects back into the parent action
///
/// Parent actions that carry no feature action leave the slice untouched and
/// produce no effects.
///
/// # Examples
///
/// ```
/// use storefront_core::{Reducer, effect::Effect, smallvec, SmallVec};
/// use storefront_core::composition::pullback;
///
/// #[derive(Clone, Default)]
/// struct FilterState {
///     active: Option<String>,
/// }
///
/// #[derive(Clone)]
/// enum FilterAction {
///     Set(Option<String>),
/// }
///
/// struct FilterReducer;
///
/// impl Reducer for FilterReducer {
///     type State = FilterState;
///     type Action = FilterAction;
///     type Environment = ();
///
///     fn reduce(&self, state: &mut FilterState, action: FilterAction, _env: &()) -> SmallVec<[Effect<FilterAction>; 4]> {
///         let FilterAction::Set(value) = action;
///         state.active = value;
///         smallvec![Effect::None]
///     }
/// }
///
/// #[derive(Clone, Default)]
/// struct AppState {
///     filter: FilterState,
///     other: u8,
/// }
///
/// #[derive(Clone)]
/// enum AppAction {
///     Filter(FilterAction),
///     Ping,
/// }
///
/// let lifted = pullback(
///     FilterReducer,
///     |app: &mut AppState| &mut app.filter,
///     |action: AppAction| match action {
///         AppAction::Filter(inner) => Some(inner),
///         AppAction::Ping => None,
///     },
///     AppAction::Filter,
/// );
///
/// let mut state = AppState::default();
/// let _ = lifted.reduce(&mut state, AppAction::Filter(FilterAction::Set(Some("male".into()))), &());
/// assert_eq!(state.filter.active.as_deref(), Some("male"));
///
/// let effects = lifted.reduce(&mut state, AppAction::Ping, &());
/// assert!(effects.is_empty());
/// ```
pub const fn pullback<S, SubS, A, SubA, E, R>(
    reducer: R,
    state: fn(&mut S) -> &mut SubS,
    extract: fn(A) -> Option<SubA>,
    embed: fn(SubA) -> A,
) -> PulledBackReducer<S, SubS, A, SubA, E, R>
where
    R: Reducer<State = SubS, Action = SubA, Environment = E>,
{
    PulledBackReducer {
        reducer,
        state,
        extract,
        embed,
        _phantom: std::marker::PhantomData,
    }
}

/// A feature reducer lifted into a parent state and action.
///
/// Created by [`pullback`].
pub struct PulledBackReducer<S, SubS, A, SubA, E, R>
where
    R: Reducer<State = SubS, Action = SubA, Environment = E>,
{
    reducer: R,
    state: fn(&mut S) -> &mut SubS,
    extract: fn(A) -> Option<SubA>,
    embed: fn(SubA) -> A,
    _phantom: std::marker::PhantomData<fn() -> E>,
}

impl<S, SubS, A, SubA, E, R> Reducer for PulledBackReducer<S, SubS, A, SubA, E, R>
where
    R: Reducer<State = SubS, Action = SubA, Environment = E>,
    A: 'static,
    SubA: 'static,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let Some(sub_action) = (self.extract)(action) else {
            return SmallVec::new();
        };

        let sub_state = (self.state)(state);

        self.reducer
            .reduce(sub_state, sub_action, env)
            .into_iter()
            .map(|effect| effect.map(self.embed))
            .collect()
    }
}
