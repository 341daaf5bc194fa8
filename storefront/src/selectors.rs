//! Pure derivations over [`AppState`].
//!
//! Plain selectors are free functions over borrowed slices of the state and
//! never fail on absent data: a catalogue or cart that was never loaded reads
//! as empty. [`MemoizedSelector`] adds referential stability on top: while the
//! store revision is unchanged it hands out the same [`Arc`], so consumers can
//! skip work with [`Arc::ptr_eq`].

use crate::app::AppState;
use crate::features::auth::AuthState;
use crate::features::cart::CartState;
use crate::features::product::ProductState;
use crate::types::{CartProduct, CategoryFilter, Product, ProductId};
use std::sync::{Arc, Mutex};

/// Whether a session token is present.
#[must_use]
pub const fn select_is_logged_in(auth: &AuthState) -> bool {
    auth.token.is_some()
}

/// The server category selected by `filter`.
///
/// ```
/// use storefront::selectors::map_filter_to_category;
/// use storefront::types::CategoryFilter;
///
/// assert_eq!(map_filter_to_category(CategoryFilter::Male), "men's clothing");
/// assert_eq!(map_filter_to_category(CategoryFilter::Jewelery), "jewelery");
/// ```
#[must_use]
pub const fn map_filter_to_category(filter: CategoryFilter) -> &'static str {
    filter.category()
}

/// Products matching `filter`; all of them when there is no filter.
#[must_use]
pub fn select_filtered_products(
    products: Option<&[Product]>,
    filter: Option<CategoryFilter>,
) -> Vec<Product> {
    let products = products.unwrap_or_default();

    match filter {
        None => products.to_vec(),
        Some(filter) => {
            let category = map_filter_to_category(filter);
            products
                .iter()
                .filter(|product| product.category == category)
                .cloned()
                .collect()
        },
    }
}

/// A product from the loaded list, or the single fetched product when its id
/// matches.
#[must_use]
pub fn select_product_by_id(state: &ProductState, id: ProductId) -> Option<&Product> {
    state
        .products
        .as_deref()
        .and_then(|products| products.iter().find(|product| product.id == id))
        .or_else(|| state.product.as_ref().filter(|product| product.id == id))
}

/// Every cart line across all cart entries.
#[must_use]
pub fn select_cart_items(state: &CartState) -> Vec<CartProduct> {
    state
        .cart
        .iter()
        .flatten()
        .flat_map(|entry| entry.products.iter().cloned())
        .collect()
}

/// Selector that caches its output for one store revision.
///
/// The store bumps its revision after every reduced action, so a revision
/// identifies one state. Calling [`select`](Self::select) again with the same
/// revision returns the previous `Arc` without looking at the state.
pub struct MemoizedSelector<I, O> {
    projector: fn(&I) -> O,
    last: Mutex<Option<(u64, Arc<O>)>>,
}

impl<I, O> MemoizedSelector<I, O> {
    /// Wrap `projector`.
    #[must_use]
    pub const fn new(projector: fn(&I) -> O) -> Self {
        Self {
            projector,
            last: Mutex::new(None),
        }
    }

    /// Project `input`, the state as of `revision`.
    pub fn select(&self, revision: u64, input: &I) -> Arc<O> {
        let Ok(mut last) = self.last.lock() else {
            // Poisoned cache: compute without memoizing
            return Arc::new((self.projector)(input));
        };

        match last.as_ref() {
            Some((cached, output)) if *cached == revision => Arc::clone(output),
            _ => {
                let output = Arc::new((self.projector)(input));
                *last = Some((revision, Arc::clone(&output)));
                output
            },
        }
    }

    /// Drop the cached output.
    pub fn reset(&self) {
        if let Ok(mut last) = self.last.lock() {
            *last = None;
        }
    }
}

impl<I, O> std::fmt::Debug for MemoizedSelector<I, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoizedSelector").finish_non_exhaustive()
    }
}

/// Build a [`MemoizedSelector`] over `projector`.
#[must_use]
pub const fn create_selector<I, O>(projector: fn(&I) -> O) -> MemoizedSelector<I, O> {
    MemoizedSelector::new(projector)
}

fn project_filtered_products(state: &AppState) -> Vec<Product> {
    select_filtered_products(state.product.products.as_deref(), state.product.category_filter)
}

fn project_cart_items(state: &AppState) -> Vec<CartProduct> {
    select_cart_items(&state.cart)
}

/// The memoized selectors shared by every consumer of one store.
#[derive(Debug)]
pub struct Selectors {
    filtered_products: MemoizedSelector<AppState, Vec<Product>>,
    cart_items: MemoizedSelector<AppState, Vec<CartProduct>>,
}

impl Selectors {
    /// Fresh selectors with empty caches.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            filtered_products: create_selector(project_filtered_products),
            cart_items: create_selector(project_cart_items),
        }
    }

    /// Catalogue filtered by the active category, for `state` at `revision`.
    pub fn filtered_products(&self, revision: u64, state: &AppState) -> Arc<Vec<Product>> {
        self.filtered_products.select(revision, state)
    }

    /// Every cart line, for `state` at `revision`.
    pub fn cart_items(&self, revision: u64, state: &AppState) -> Arc<Vec<CartProduct>> {
        self.cart_items.select(revision, state)
    }
}

impl Default for Selectors {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::fixtures;

    #[test]
    fn test_is_logged_in() {
        assert!(!select_is_logged_in(&AuthState::default()));
        assert!(select_is_logged_in(&AuthState::with_token(Some("abc".into()))));
    }

    #[test]
    fn test_filter_keeps_matching_category_only() {
        let products = vec![
            fixtures::product(1, "Jacket", "men's clothing", 55.99),
            fixtures::product(2, "Ring", "jewelery", 9.99),
        ];

        let filtered = select_filtered_products(Some(&products), Some(CategoryFilter::Male));

        assert_eq!(filtered, vec![products[0].clone()]);
    }

    #[test]
    fn test_filter_absent_or_unset() {
        assert!(select_filtered_products(None, Some(CategoryFilter::Female)).is_empty());
        assert!(select_filtered_products(None, None).is_empty());
        assert_eq!(
            select_filtered_products(Some(&fixtures::products()), None),
            fixtures::products()
        );
    }

    #[test]
    fn test_every_filter_selects_one_fixture() {
        let products = fixtures::products();
        for filter in CategoryFilter::ALL {
            let filtered = select_filtered_products(Some(&products), Some(filter));
            assert_eq!(filtered.len(), 1, "filter {filter}");
            assert_eq!(filtered[0].category, map_filter_to_category(filter));
        }
    }

    #[test]
    fn test_product_by_id_prefers_list() {
        let mut state = ProductState {
            products: Some(fixtures::products()),
            product: Some(fixtures::product(9, "Lamp", "electronics", 20.0)),
            ..ProductState::default()
        };

        assert_eq!(select_product_by_id(&state, 2).map(|p| p.id), Some(2));
        assert_eq!(select_product_by_id(&state, 9).map(|p| p.id), Some(9));
        assert_eq!(select_product_by_id(&state, 10), None);

        state.products = None;
        assert_eq!(select_product_by_id(&state, 2), None);
    }

    #[test]
    fn test_cart_items_flatten_entries() {
        assert!(select_cart_items(&CartState::default()).is_empty());

        let state = CartState {
            cart: Some(fixtures::carts()),
            ..CartState::default()
        };
        let items = select_cart_items(&state);

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].product_id, 1);
        assert_eq!(items[0].quantity, 4);
        assert_eq!(items[2].product_id, 3);
    }

    #[test]
    fn test_memoized_selector_is_referentially_stable() {
        let selectors = Selectors::new();
        let mut state = AppState::default();
        state.product.products = Some(fixtures::products());

        let first = selectors.filtered_products(1, &state);
        let second = selectors.filtered_products(1, &state);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 4);

        state.product.category_filter = Some(CategoryFilter::Electronics);
        let third = selectors.filtered_products(2, &state);
        assert!(!Arc::ptr_eq(&second, &third));
        assert_eq!(third.len(), 1);
    }

    #[test]
    fn test_cached_read_skips_projection() {
        let selector = create_selector(|state: &AppState| select_cart_items(&state.cart));
        let mut state = AppState::default();
        state.cart.cart = Some(fixtures::carts());

        let first = selector.select(3, &state);
        // Same revision: the state is not looked at again
        let second = selector.select(3, &AppState::default());
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 3);

        let third = selector.select(4, &AppState::default());
        assert!(third.is_empty());
    }

    #[test]
    fn test_memoized_selector_reset() {
        let selector = create_selector(|n: &u32| n * 2);

        let first = selector.select(1, &21);
        assert_eq!(*first, 42);
        selector.reset();

        let second = selector.select(1, &21);
        assert_eq!(*second, 42);
        assert!(!Arc::ptr_eq(&first, &second));
    }
}
