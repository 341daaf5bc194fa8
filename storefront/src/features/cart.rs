//! Shopping cart.

use crate::constants::notifications;
use crate::environment::Environment;
use crate::features::toast_success;
use crate::providers::CartApi;
use crate::types::CartRequest;
use serde::Serialize;
use std::marker::PhantomData;
use storefront_core::{cancellable, effect::Effect, reducer::Reducer, smallvec, SmallVec};
use storefront_macros::Action;

/// Cart state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CartState {
    /// Cart entries, once loaded or added.
    pub cart: Option<Vec<CartRequest>>,
    /// Message of the last failed request.
    pub error: Option<String>,
    /// A request is in flight.
    pub is_loading: bool,
}

/// Cart actions.
#[derive(Action, Clone, Debug, PartialEq, Eq)]
#[action(source = "Cart")]
pub enum CartAction {
    /// Fetch the carts.
    GetCarts,

    /// Carts fetched.
    #[terminal]
    GetCartsSuccess {
        /// Every cart entry
        cart: Vec<CartRequest>,
    },

    /// Cart request failed.
    #[terminal]
    GetCartsFailure {
        /// Human-readable message
        error: String,
    },

    /// Create a cart entry.
    AddCart {
        /// The entry to create
        request: CartRequest,
    },

    /// Entry created.
    #[terminal]
    AddCartSuccess {
        /// The entry as returned by the server
        cart: CartRequest,
    },

    /// Creating the entry failed.
    #[terminal]
    AddCartFailure {
        /// Human-readable message
        error: String,
    },
}

/// Reducer of [`CartState`].
///
/// Added entries are appended to the loaded list. Adding does not raise
/// `is_loading`; only its result clears it.
pub struct CartReducer<E> {
    _env: PhantomData<fn() -> E>,
}

impl<E> CartReducer<E> {
    /// Create the reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self { _env: PhantomData }
    }
}

impl<E> Default for CartReducer<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for CartReducer<E> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<E: Environment> Reducer for CartReducer<E> {
    type State = CartState;
    type Action = CartAction;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut CartState,
        action: CartAction,
        env: &E,
    ) -> SmallVec<[Effect<CartAction>; 4]> {
        let id = action.action_type();

        match action {
            CartAction::GetCarts => {
                state.is_loading = true;

                let env = env.clone();
                smallvec![cancellable! {
                    id: id,
                    async {
                        match env.cart_api().get_carts().await {
                            Ok(cart) => Some(CartAction::GetCartsSuccess { cart }),
                            Err(error) => {
                                tracing::warn!(%error, "Loading carts failed");
                                Some(CartAction::GetCartsFailure { error: error.to_string() })
                            },
                        }
                    }
                }]
            },

            CartAction::GetCartsSuccess { cart } => {
                state.cart = Some(cart);
                state.is_loading = false;
                smallvec![Effect::None]
            },

            CartAction::GetCartsFailure { error } | CartAction::AddCartFailure { error } => {
                state.error = Some(error);
                state.is_loading = false;
                smallvec![Effect::None]
            },

            CartAction::AddCart { request } => {
                let env = env.clone();
                smallvec![cancellable! {
                    id: id,
                    async {
                        match env.cart_api().add_cart(&request).await {
                            Ok(cart) => {
                                toast_success(&env, notifications::ADD_TO_CART_SUCCESS);
                                Some(CartAction::AddCartSuccess { cart })
                            },
                            Err(error) => {
                                tracing::warn!(%error, "Adding to cart failed");
                                Some(CartAction::AddCartFailure { error: error.to_string() })
                            },
                        }
                    }
                }]
            },

            CartAction::AddCartSuccess { cart } => {
                state.cart.get_or_insert_with(Vec::new).push(cart);
                state.is_loading = false;
                smallvec![Effect::None]
            },
        }
    }
}
