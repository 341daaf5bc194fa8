//! Product catalogue and category filter.

use crate::environment::Environment;
use crate::providers::ProductApi;
use crate::types::{CategoryFilter, Product, ProductId};
use serde::Serialize;
use std::marker::PhantomData;
use storefront_core::{cancellable, effect::Effect, reducer::Reducer, smallvec, SmallVec};
use storefront_macros::Action;

/// Catalogue state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductState {
    /// The product list, once loaded.
    pub products: Option<Vec<Product>>,
    /// A single product fetched by id (when the list was not loaded).
    pub product: Option<Product>,
    /// Message of the last failed request.
    pub error: Option<String>,
    /// A request is in flight.
    pub is_loading: bool,
    /// Active category filter; purely client-side.
    pub category_filter: Option<CategoryFilter>,
}

/// Catalogue actions.
#[derive(Action, Clone, Debug, PartialEq)]
#[action(source = "Product")]
pub enum ProductAction {
    /// Fetch the product list.
    LoadProducts,

    /// Product list fetched.
    #[terminal]
    LoadProductsSuccess {
        /// The catalogue
        products: Vec<Product>,
    },

    /// Product list request failed.
    #[terminal]
    LoadProductsFailure {
        /// Human-readable message
        error: String,
    },

    /// Set the category filter, as given.
    SetCategoryFilter {
        /// New filter; `None` shows every category
        category: Option<CategoryFilter>,
    },

    /// Fetch one product.
    GetProductById {
        /// Product id
        id: ProductId,
    },

    /// Product fetched.
    #[terminal]
    GetProductByIdSuccess {
        /// The product
        product: Product,
    },

    /// Product request failed.
    #[terminal]
    GetProductByIdFailure {
        /// Human-readable message
        error: String,
    },
}

/// The filter after the user picks `selected` while `current` is active:
/// picking the active category clears the filter.
///
/// ```
/// use storefront::features::product::toggled_filter;
/// use storefront::types::CategoryFilter::{Female, Male};
///
/// assert_eq!(toggled_filter(None, Male), Some(Male));
/// assert_eq!(toggled_filter(Some(Male), Male), None);
/// assert_eq!(toggled_filter(Some(Male), Female), Some(Female));
/// ```
#[must_use]
pub fn toggled_filter(
    current: Option<CategoryFilter>,
    selected: CategoryFilter,
) -> Option<CategoryFilter> {
    if current == Some(selected) {
        None
    } else {
        Some(selected)
    }
}

/// Reducer of [`ProductState`].
///
/// `setCategoryFilter` stores the filter as given; the toggle is computed by
/// the caller with [`toggled_filter`].
pub struct ProductReducer<E> {
    _env: PhantomData<fn() -> E>,
}

impl<E> ProductReducer<E> {
    /// Create the reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self { _env: PhantomData }
    }
}

impl<E> Default for ProductReducer<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for ProductReducer<E> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<E: Environment> Reducer for ProductReducer<E> {
    type State = ProductState;
    type Action = ProductAction;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut ProductState,
        action: ProductAction,
        env: &E,
    ) -> SmallVec<[Effect<ProductAction>; 4]> {
        let id = action.action_type();

        match action {
            ProductAction::LoadProducts => {
                state.is_loading = true;

                let env = env.clone();
                smallvec![cancellable! {
                    id: id,
                    async {
                        match env.product_api().get_products().await {
                            Ok(products) => {
                                tracing::debug!(count = products.len(), "Products loaded");
                                Some(ProductAction::LoadProductsSuccess { products })
                            },
                            Err(error) => {
                                tracing::warn!(%error, "Loading products failed");
                                Some(ProductAction::LoadProductsFailure { error: error.to_string() })
                            },
                        }
                    }
                }]
            },

            ProductAction::LoadProductsSuccess { products } => {
                state.products = Some(products);
                state.is_loading = false;
                smallvec![Effect::None]
            },

            ProductAction::LoadProductsFailure { error }
            | ProductAction::GetProductByIdFailure { error } => {
                state.error = Some(error);
                state.is_loading = false;
                smallvec![Effect::None]
            },

            ProductAction::SetCategoryFilter { category } => {
                state.category_filter = category;
                smallvec![Effect::None]
            },

            ProductAction::GetProductById { id: product_id } => {
                state.is_loading = true;

                let env = env.clone();
                smallvec![cancellable! {
                    id: id,
                    async {
                        match env.product_api().get_product(product_id).await {
                            Ok(product) => Some(ProductAction::GetProductByIdSuccess { product }),
                            Err(error) => {
                                tracing::warn!(%error, product_id, "Loading product failed");
                                Some(ProductAction::GetProductByIdFailure { error: error.to_string() })
                            },
                        }
                    }
                }]
            },

            ProductAction::GetProductByIdSuccess { product } => {
                state.product = Some(product);
                state.is_loading = false;
                smallvec![Effect::None]
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::mocks::{fixtures, MockEnvironment};
    use storefront_testing::{assertions, collect_actions, ReducerTest};

    #[test]
    fn test_load_products_flow() {
        let env = MockEnvironment::new();
        let mut state = ProductState::default();

        let effects = ProductReducer::new().reduce(&mut state, ProductAction::LoadProducts, &env);
        assert!(state.is_loading);
        assertions::assert_has_cancellable_effect(&effects, "Product/loadProducts");

        let actions = tokio_test::block_on(collect_actions(effects));
        assert_eq!(
            actions,
            vec![ProductAction::LoadProductsSuccess {
                products: fixtures::products()
            }]
        );

        for action in actions {
            let _ = ProductReducer::new().reduce(&mut state, action, &env);
        }
        assert!(!state.is_loading);
        assert_eq!(state.products.as_ref().map(Vec::len), Some(4));
    }

    #[test]
    fn test_load_products_failure_keeps_previous_list() {
        let env = MockEnvironment::new();
        env.products
            .products
            .respond_with(Err(ApiError::Transport("connection refused".into())));

        let mut state = ProductState {
            products: Some(fixtures::products()),
            ..ProductState::default()
        };

        let effects = ProductReducer::new().reduce(&mut state, ProductAction::LoadProducts, &env);
        let actions = tokio_test::block_on(collect_actions(effects));
        assert_eq!(
            actions,
            vec![ProductAction::LoadProductsFailure {
                error: "Request failed: connection refused".into()
            }]
        );

        for action in actions {
            let _ = ProductReducer::new().reduce(&mut state, action, &env);
        }
        assert_eq!(state.error.as_deref(), Some("Request failed: connection refused"));
        assert!(!state.is_loading);
        assert!(state.products.is_some());
    }

    #[test]
    fn test_set_category_filter_is_verbatim() {
        ReducerTest::new(ProductReducer::new())
            .with_env(MockEnvironment::new())
            .given_state(ProductState {
                category_filter: Some(CategoryFilter::Male),
                ..ProductState::default()
            })
            .when_action(ProductAction::SetCategoryFilter {
                category: Some(CategoryFilter::Male),
            })
            .then_state(|state| assert_eq!(state.category_filter, Some(CategoryFilter::Male)))
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();

        ReducerTest::new(ProductReducer::new())
            .with_env(MockEnvironment::new())
            .given_state(ProductState::default())
            .when_action(ProductAction::SetCategoryFilter {
                category: Some(CategoryFilter::Jewelery),
            })
            .when_action(ProductAction::SetCategoryFilter { category: None })
            .then_state(|state| assert_eq!(state.category_filter, None))
            .run();
    }

    #[test]
    fn test_get_product_by_id() {
        let env = MockEnvironment::new();
        let mut state = ProductState::default();

        let effects =
            ProductReducer::new().reduce(&mut state, ProductAction::GetProductById { id: 3 }, &env);
        assert!(state.is_loading);
        assertions::assert_has_cancellable_effect(&effects, "Product/getProductById");

        let actions = tokio_test::block_on(collect_actions(effects));
        for action in actions {
            let _ = ProductReducer::new().reduce(&mut state, action, &env);
        }

        assert_eq!(state.product.as_ref().map(|p| p.id), Some(3));
        assert!(!state.is_loading);
        assert_eq!(env.products.product.requests(), vec![3]);
    }

    #[test]
    fn test_get_product_by_id_not_found() {
        let env = MockEnvironment::new();
        let mut state = ProductState::default();

        let effects = ProductReducer::new().reduce(
            &mut state,
            ProductAction::GetProductById { id: 404 },
            &env,
        );
        let actions = tokio_test::block_on(collect_actions(effects));

        assert_eq!(
            actions,
            vec![ProductAction::GetProductByIdFailure {
                error: "404 Not Found".into()
            }]
        );
    }
}
