//! Declarative macros for ergonomic effect construction
//!
//! These macros reduce boilerplate when creating `Effect` variants, particularly
//! for request effects that should be cancelled when a newer request starts.

/// Create an `Effect::Future` from an async block
///
/// # Example
///
/// ```rust,ignore
/// use storefront_core::async_effect;
///
/// async_effect! {
///     match api.get_products().await {
///         Ok(products) => Some(ProductAction::LoadProductsSuccess { products }),
///         Err(error) => Some(ProductAction::LoadProductsFailure { error: error.to_string() }),
///     }
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}

/// Create an `Effect::Cancellable` around an async block
///
/// Starting the effect cancels whatever is still in flight under the same id,
/// so only the latest request can feed its result back into the store.
///
/// # Example
///
/// ```rust,ignore
/// use storefront_core::cancellable;
///
/// cancellable! {
///     id: "Auth/login",
///     async {
///         match api.login(&credentials).await {
///             Ok(token) => Some(AuthAction::LoginSuccess { token }),
///             Err(error) => Some(AuthAction::LoginFailure { error: error.to_string() }),
///         }
///     }
/// }
/// ```
#[macro_export]
macro_rules! cancellable {
    (
        id: $id:expr,
        async { $($body:tt)* }
    ) => {
        $crate::effect::Effect::Cancellable {
            id: ::std::convert::Into::into($id),
            effect: ::std::boxed::Box::new($crate::async_effect! { $($body)* }),
        }
    };
}
