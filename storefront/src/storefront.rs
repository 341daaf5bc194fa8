//! The storefront facade.
//!
//! [`Storefront`] owns the store and plays the part of the pages: it validates
//! forms, dispatches actions, waits for their results and reads state through
//! the shared memoized selectors. Navigation goes through the [`Router`], so
//! the same guards apply as for any other page change.

use crate::app::{AppAction, AppReducer, AppState, RootAction};
use crate::config::Config;
use crate::environment::Environment;
use crate::error::{Result, StorefrontError};
use crate::features::auth::AuthAction;
use crate::features::cart::CartAction;
use crate::features::product::{toggled_filter, ProductAction};
use crate::features::profile::ProfileAction;
use crate::forms::{LoginForm, RegisterForm};
use crate::router::{Navigation, Router};
use crate::selectors::{select_is_logged_in, select_product_by_id, Selectors};
use crate::types::{CartProduct, CartRequest, CategoryFilter, Product, ProductId, Profile, UserId};
use std::sync::Arc;
use std::time::Duration;
use storefront_runtime::Store;

/// The store type behind a [`Storefront`].
pub type AppStore<E> = Store<AppState, AppAction, E, AppReducer<E>>;

/// Storefront session over an environment.
pub struct Storefront<E: Environment> {
    store: AppStore<E>,
    router: Router<E::Navigator>,
    selectors: Selectors,
    request_timeout: Duration,
    user_id: UserId,
}

impl<E: Environment> Storefront<E> {
    /// Start a session.
    ///
    /// The persisted token seeds the initial state, then
    /// `@storefront/effects/init` runs once and its session check settles
    /// before this returns.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Store`] if the session check does not settle
    /// within the request timeout.
    pub async fn bootstrap(env: E, config: &Config) -> Result<Self> {
        let token = env.storage().load_token().unwrap_or_else(|error| {
            tracing::warn!(%error, "Ignoring unreadable persisted token");
            None
        });

        let router = Router::new(env.navigator().clone());
        let store = Store::new(AppState::with_token(token), AppReducer::new(), env);

        let storefront = Self {
            store,
            router,
            selectors: Selectors::new(),
            request_timeout: config.request_timeout,
            user_id: config.user_id,
        };

        storefront
            .store
            .send_and_wait_for(
                RootAction::Init.into(),
                |action| {
                    matches!(
                        action,
                        AppAction::Auth(AuthAction::RestoreSession { .. })
                            | AppAction::Root(RootAction::NoAction)
                    )
                },
                storefront.request_timeout,
            )
            .await?;

        tracing::debug!(
            logged_in = storefront.is_logged_in().await,
            "Storefront bootstrapped"
        );
        Ok(storefront)
    }

    /// The underlying store.
    pub const fn store(&self) -> &AppStore<E> {
        &self.store
    }

    /// The router.
    pub const fn router(&self) -> &Router<E::Navigator> {
        &self.router
    }

    /// User the cart and profile requests act for.
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Dispatch `action` and wait for the first action matching `settled`.
    async fn request<F>(&self, action: impl Into<AppAction>, settled: F) -> Result<AppAction>
    where
        F: Fn(&AppAction) -> bool,
    {
        let action = action.into();
        tracing::debug!(action = action.action_type(), "Dispatching request");

        Ok(self
            .store
            .send_and_wait_for(action, settled, self.request_timeout)
            .await?)
    }

    /// Log in.
    ///
    /// # Errors
    ///
    /// - [`StorefrontError::Validation`]: the form is invalid; nothing was sent
    /// - [`StorefrontError::Request`]: the credentials were rejected
    pub async fn login(&self, form: LoginForm) -> Result<()> {
        let request = form.validate().map_err(StorefrontError::Validation)?;

        let result = self
            .request(
                AuthAction::Login {
                    username: request.username,
                    password: request.password,
                },
                |action| {
                    matches!(
                        action,
                        AppAction::Auth(
                            AuthAction::LoginSuccess { .. } | AuthAction::LoginFailure { .. }
                        )
                    )
                },
            )
            .await?;

        match result {
            AppAction::Auth(AuthAction::LoginFailure { error }) => Err(StorefrontError::Request(error)),
            _ => Ok(()),
        }
    }

    /// Create an account.
    ///
    /// # Errors
    ///
    /// - [`StorefrontError::Validation`]: the form is invalid; nothing was sent
    /// - [`StorefrontError::Request`]: the server refused the account
    pub async fn register(&self, form: RegisterForm) -> Result<()> {
        let request = form.validate().map_err(StorefrontError::Validation)?;

        let result = self
            .request(
                AuthAction::Register {
                    username: request.username,
                    email: request.email,
                    password: request.password,
                    confirm_password: request.confirm_password,
                },
                |action| {
                    matches!(
                        action,
                        AppAction::Auth(AuthAction::RegisterSuccess | AuthAction::RegisterFailure { .. })
                    )
                },
            )
            .await?;

        match result {
            AppAction::Auth(AuthAction::RegisterFailure { error }) => {
                Err(StorefrontError::Request(error))
            },
            _ => Ok(()),
        }
    }

    /// End the session. Logging out twice is harmless.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Store`] if the logout does not settle.
    pub async fn logout(&self) -> Result<()> {
        self.request(AuthAction::Logout, |action| {
            matches!(action, AppAction::Root(RootAction::NoAction))
        })
        .await?;
        Ok(())
    }

    /// Fetch the catalogue.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Request`] if the request failed.
    pub async fn load_products(&self) -> Result<Arc<Vec<Product>>> {
        let result = self
            .request(ProductAction::LoadProducts, |action| {
                matches!(
                    action,
                    AppAction::Product(
                        ProductAction::LoadProductsSuccess { .. }
                            | ProductAction::LoadProductsFailure { .. }
                    )
                )
            })
            .await?;

        match result {
            AppAction::Product(ProductAction::LoadProductsFailure { error }) => {
                Err(StorefrontError::Request(error))
            },
            _ => Ok(self.filtered_products().await),
        }
    }

    /// One product.
    ///
    /// Read from the loaded catalogue when there is one; otherwise fetched
    /// by id.
    ///
    /// # Errors
    ///
    /// - [`StorefrontError::NotFound`]: the loaded catalogue has no such product
    /// - [`StorefrontError::Request`]: fetching the product failed
    pub async fn product(&self, id: ProductId) -> Result<Product> {
        let (loaded, found) = self
            .store
            .state(|state| {
                (
                    state.product.products.is_some(),
                    select_product_by_id(&state.product, id).cloned(),
                )
            })
            .await;

        if loaded {
            return found.ok_or_else(|| StorefrontError::NotFound(format!("Product {id}")));
        }

        let result = self
            .request(ProductAction::GetProductById { id }, |action| {
                matches!(
                    action,
                    AppAction::Product(
                        ProductAction::GetProductByIdSuccess { .. }
                            | ProductAction::GetProductByIdFailure { .. }
                    )
                )
            })
            .await?;

        match result {
            AppAction::Product(ProductAction::GetProductByIdSuccess { product }) => Ok(product),
            AppAction::Product(ProductAction::GetProductByIdFailure { error }) => {
                Err(StorefrontError::Request(error))
            },
            _ => Err(StorefrontError::NotFound(format!("Product {id}"))),
        }
    }

    /// Select a category, or clear the filter when `category` is already
    /// selected. Returns the new filter.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Store`] if the store is shutting down.
    pub async fn select_category(&self, category: CategoryFilter) -> Result<Option<CategoryFilter>> {
        let current = self.store.state(|state| state.product.category_filter).await;
        let next = toggled_filter(current, category);

        self.store
            .send(ProductAction::SetCategoryFilter { category: next }.into())
            .await?;
        Ok(next)
    }

    /// Fetch the carts.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Request`] if the request failed.
    pub async fn load_cart(&self) -> Result<Arc<Vec<CartProduct>>> {
        let result = self
            .request(CartAction::GetCarts, |action| {
                matches!(
                    action,
                    AppAction::Cart(CartAction::GetCartsSuccess { .. } | CartAction::GetCartsFailure { .. })
                )
            })
            .await?;

        match result {
            AppAction::Cart(CartAction::GetCartsFailure { error }) => Err(StorefrontError::Request(error)),
            _ => Ok(self.cart_items().await),
        }
    }

    /// Add `quantity` of a product to the current user's cart.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Request`] if the request failed.
    pub async fn add_to_cart(&self, product_id: ProductId, quantity: u32) -> Result<CartRequest> {
        let request = CartRequest {
            id: self.user_id,
            user_id: self.user_id,
            products: vec![CartProduct {
                product_id,
                quantity,
            }],
        };

        let result = self
            .request(CartAction::AddCart { request }, |action| {
                matches!(
                    action,
                    AppAction::Cart(CartAction::AddCartSuccess { .. } | CartAction::AddCartFailure { .. })
                )
            })
            .await?;

        match result {
            AppAction::Cart(CartAction::AddCartSuccess { cart }) => Ok(cart),
            AppAction::Cart(CartAction::AddCartFailure { error }) => Err(StorefrontError::Request(error)),
            _ => Err(StorefrontError::Request("Unexpected cart result".to_string())),
        }
    }

    /// Fetch a profile; the session's user when `id` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Request`] if the request failed.
    pub async fn load_profile(&self, id: Option<UserId>) -> Result<Profile> {
        let id = id.unwrap_or(self.user_id);

        let result = self
            .request(ProfileAction::GetProfile { id }, |action| {
                matches!(
                    action,
                    AppAction::Profile(
                        ProfileAction::GetProfileSuccess { .. } | ProfileAction::GetProfileFailure { .. }
                    )
                )
            })
            .await?;

        match result {
            AppAction::Profile(ProfileAction::GetProfileSuccess { profile }) => Ok(profile),
            AppAction::Profile(ProfileAction::GetProfileFailure { error }) => {
                Err(StorefrontError::Request(error))
            },
            _ => Err(StorefrontError::NotFound(format!("Profile {id}"))),
        }
    }

    /// Navigate to `path` through the guards.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Router`] for unknown paths and redirect loops.
    pub async fn navigate(&self, path: &str) -> Result<Navigation> {
        Ok(self.router.navigate(path, &self.store).await?)
    }

    /// The catalogue under the active category filter.
    pub async fn filtered_products(&self) -> Arc<Vec<Product>> {
        self.store
            .state(|state| {
                // Under the read lock, so the revision belongs to `state`
                self.selectors
                    .filtered_products(self.store.revision(), state)
            })
            .await
    }

    /// Every line of the loaded carts.
    pub async fn cart_items(&self) -> Arc<Vec<CartProduct>> {
        self.store
            .state(|state| self.selectors.cart_items(self.store.revision(), state))
            .await
    }

    /// Whether a session is active.
    pub async fn is_logged_in(&self) -> bool {
        self.store.state(|state| select_is_logged_in(&state.auth)).await
    }

    /// A snapshot of the whole state.
    pub async fn state(&self) -> AppState {
        self.store.state(AppState::clone).await
    }

    /// Wait for running effects, then stop accepting actions.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Store`] if effects are still running after
    /// the request timeout.
    pub async fn shutdown(&self) -> Result<()> {
        Ok(self.store.shutdown(self.request_timeout).await?)
    }
}
