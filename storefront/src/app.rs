//! Application state tree, action catalog and root reducer.
//!
//! [`AppReducer`] lifts every feature reducer into [`AppState`] with
//! `pullback` and combines them with the root effects:
//!
//! - `@storefront/effects/init` reads the persisted token once and dispatches
//!   `Auth/restoreSession` or `Auth/logout`
//! - `Auth/logout` forgets the persisted token, redirects to the login page
//!   and emits `NO_ACTION`

use crate::constants::routes;
use crate::environment::Environment;
use crate::features::auth::{AuthAction, AuthReducer, AuthState};
use crate::features::cart::{CartAction, CartReducer, CartState};
use crate::features::product::{ProductAction, ProductReducer, ProductState};
use crate::features::profile::{ProfileAction, ProfileReducer, ProfileState};
use crate::providers::Navigator;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;
use storefront_core::composition::{combine_reducers, pullback, CombinedReducer};
use storefront_core::{async_effect, effect::Effect, reducer::Reducer, smallvec, SmallVec};
use storefront_macros::Action;

/// The whole client-visible state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppState {
    /// Authentication.
    pub auth: AuthState,
    /// Catalogue.
    pub product: ProductState,
    /// Cart.
    pub cart: CartState,
    /// Profile.
    pub profile: ProfileState,
}

impl AppState {
    /// Initial state of a process that found `token` in storage.
    #[must_use]
    pub fn with_token(token: Option<String>) -> Self {
        Self {
            auth: AuthState::with_token(token),
            ..Self::default()
        }
    }
}

/// Actions that belong to no feature.
#[derive(Action, Clone, Debug, PartialEq, Eq)]
#[action(source = "Root")]
pub enum RootAction {
    /// Dispatched once when the store starts.
    #[action(name = "@storefront/effects/init")]
    Init,

    /// Terminal no-op; observed by no reducer.
    #[terminal]
    #[action(name = "NO_ACTION")]
    NoAction,
}

/// Every action of the storefront.
#[derive(Clone, Debug, PartialEq)]
pub enum AppAction {
    /// Root action.
    Root(RootAction),
    /// Authentication action.
    Auth(AuthAction),
    /// Catalogue action.
    Product(ProductAction),
    /// Cart action.
    Cart(CartAction),
    /// Profile action.
    Profile(ProfileAction),
}

impl AppAction {
    /// The unique name of the action (`"Auth/login"`, `"NO_ACTION"`, ...).
    #[must_use]
    pub const fn action_type(&self) -> &'static str {
        match self {
            Self::Root(action) => action.action_type(),
            Self::Auth(action) => action.action_type(),
            Self::Product(action) => action.action_type(),
            Self::Cart(action) => action.action_type(),
            Self::Profile(action) => action.action_type(),
        }
    }

    /// Whether the action ends a request (success or failure).
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        match self {
            Self::Root(action) => action.is_terminal(),
            Self::Auth(action) => action.is_terminal(),
            Self::Product(action) => action.is_terminal(),
            Self::Cart(action) => action.is_terminal(),
            Self::Profile(action) => action.is_terminal(),
        }
    }

    /// Every action name of the storefront.
    pub fn action_types() -> impl Iterator<Item = &'static str> {
        [
            RootAction::ACTION_TYPES,
            AuthAction::ACTION_TYPES,
            ProductAction::ACTION_TYPES,
            CartAction::ACTION_TYPES,
            ProfileAction::ACTION_TYPES,
        ]
        .into_iter()
        .flatten()
        .copied()
    }

    fn into_auth(self) -> Option<AuthAction> {
        match self {
            Self::Auth(action) => Some(action),
            _ => None,
        }
    }

    fn into_product(self) -> Option<ProductAction> {
        match self {
            Self::Product(action) => Some(action),
            _ => None,
        }
    }

    fn into_cart(self) -> Option<CartAction> {
        match self {
            Self::Cart(action) => Some(action),
            _ => None,
        }
    }

    fn into_profile(self) -> Option<ProfileAction> {
        match self {
            Self::Profile(action) => Some(action),
            _ => None,
        }
    }
}

impl From<RootAction> for AppAction {
    fn from(action: RootAction) -> Self {
        Self::Root(action)
    }
}

impl From<AuthAction> for AppAction {
    fn from(action: AuthAction) -> Self {
        Self::Auth(action)
    }
}

impl From<ProductAction> for AppAction {
    fn from(action: ProductAction) -> Self {
        Self::Product(action)
    }
}

impl From<CartAction> for AppAction {
    fn from(action: CartAction) -> Self {
        Self::Cart(action)
    }
}

impl From<ProfileAction> for AppAction {
    fn from(action: ProfileAction) -> Self {
        Self::Profile(action)
    }
}

type BoxedReducer<E> =
    Box<dyn Reducer<State = AppState, Action = AppAction, Environment = E> + Send + Sync>;

fn auth_state(state: &mut AppState) -> &mut AuthState {
    &mut state.auth
}

fn product_state(state: &mut AppState) -> &mut ProductState {
    &mut state.product
}

fn cart_state(state: &mut AppState) -> &mut CartState {
    &mut state.cart
}

fn profile_state(state: &mut AppState) -> &mut ProfileState {
    &mut state.profile
}

/// Effects that are not tied to a single feature slice.
struct RootReducer<E> {
    _env: PhantomData<fn() -> E>,
}

impl<E: Environment> Reducer for RootReducer<E> {
    type State = AppState;
    type Action = AppAction;
    type Environment = E;

    fn reduce(
        &self,
        _state: &mut AppState,
        action: AppAction,
        env: &E,
    ) -> SmallVec<[Effect<AppAction>; 4]> {
        match action {
            AppAction::Root(RootAction::Init) => {
                let env = env.clone();
                smallvec![async_effect! {
                    match env.storage().load_token() {
                        Ok(Some(token)) => {
                            tracing::info!("Restoring persisted session");
                            Some(AppAction::Auth(AuthAction::RestoreSession { token }))
                        },
                        Ok(None) => Some(AppAction::Auth(AuthAction::Logout)),
                        Err(error) => {
                            tracing::warn!(%error, "Failed to read persisted token");
                            Some(AppAction::Auth(AuthAction::Logout))
                        },
                    }
                }]
            },

            AppAction::Auth(AuthAction::Logout) => {
                let env = env.clone();
                smallvec![async_effect! {
                    if let Err(error) = env.storage().clear_token() {
                        tracing::warn!(%error, "Failed to remove persisted token");
                    }
                    env.navigator().navigate_by_url(routes::LOGIN);
                    tracing::info!("Logged out");

                    Some(AppAction::Root(RootAction::NoAction))
                }]
            },

            _ => SmallVec::new(),
        }
    }
}

/// The storefront's reducer: every feature plus the root effects.
///
/// Cheap to clone; clones share the composed reducer.
pub struct AppReducer<E: Environment> {
    inner: Arc<CombinedReducer<AppState, AppAction, E>>,
}

impl<E: Environment> AppReducer<E> {
    /// Compose the reducer.
    #[must_use]
    pub fn new() -> Self {
        let reducers: Vec<BoxedReducer<E>> = vec![
            Box::new(RootReducer::<E> { _env: PhantomData }),
            Box::new(pullback(
                AuthReducer::<E>::new(),
                auth_state,
                AppAction::into_auth,
                AppAction::Auth,
            )),
            Box::new(pullback(
                ProductReducer::<E>::new(),
                product_state,
                AppAction::into_product,
                AppAction::Product,
            )),
            Box::new(pullback(
                CartReducer::<E>::new(),
                cart_state,
                AppAction::into_cart,
                AppAction::Cart,
            )),
            Box::new(pullback(
                ProfileReducer::<E>::new(),
                profile_state,
                AppAction::into_profile,
                AppAction::Profile,
            )),
        ];

        Self {
            inner: Arc::new(combine_reducers(reducers)),
        }
    }
}

impl<E: Environment> Default for AppReducer<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Environment> Clone for AppReducer<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: Environment> Reducer for AppReducer<E> {
    type State = AppState;
    type Action = AppAction;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut AppState,
        action: AppAction,
        env: &E,
    ) -> SmallVec<[Effect<AppAction>; 4]> {
        tracing::debug!(action = action.action_type(), "Reducing");
        self.inner.reduce(state, action, env)
    }
}
