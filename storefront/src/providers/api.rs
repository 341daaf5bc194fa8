//! REST resource traits.
//!
//! One trait per resource of the storefront API. Implementations perform a
//! single request attempt and report any failure as an [`ApiError`]; they hold
//! no business logic.

use crate::error::ApiError;
use crate::types::{
    CartRequest, LoginRequest, LoginResponse, Product, ProductId, Profile, RegisterRequest,
    RegisterResponse, UserId,
};
use std::future::Future;

/// Authentication endpoints.
pub trait AuthApi: Clone + Send + Sync + 'static {
    /// `POST /auth/login`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the credentials are rejected.
    fn login(
        &self,
        request: &LoginRequest,
    ) -> impl Future<Output = Result<LoginResponse, ApiError>> + Send;

    /// `POST /users`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    fn register(
        &self,
        request: &RegisterRequest,
    ) -> impl Future<Output = Result<RegisterResponse, ApiError>> + Send;
}

/// Product catalogue endpoints.
pub trait ProductApi: Clone + Send + Sync + 'static {
    /// `GET /products`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    fn get_products(&self) -> impl Future<Output = Result<Vec<Product>, ApiError>> + Send;

    /// `GET /products/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the product does not exist.
    fn get_product(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<Product, ApiError>> + Send;
}

/// Cart endpoints.
pub trait CartApi: Clone + Send + Sync + 'static {
    /// `GET /carts`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    fn get_carts(&self) -> impl Future<Output = Result<Vec<CartRequest>, ApiError>> + Send;

    /// `POST /carts`, returning the created entry.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    fn add_cart(
        &self,
        request: &CartRequest,
    ) -> impl Future<Output = Result<CartRequest, ApiError>> + Send;
}

/// Profile endpoints.
pub trait ProfileApi: Clone + Send + Sync + 'static {
    /// `GET /users/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the user does not exist.
    fn get_profile(&self, id: UserId) -> impl Future<Output = Result<Profile, ApiError>> + Send;
}
