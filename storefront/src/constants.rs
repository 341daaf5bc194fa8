//! Storefront constants.
//!
//! Route paths, storage keys, validation rules and notification texts shared
//! by the effects, the router and the forms.

/// Route paths of the storefront.
pub mod routes {
    /// Layout root of the authenticated area (the home route).
    pub const HOME: &str = "/";

    /// Login page (guests only).
    pub const LOGIN: &str = "/login";

    /// Registration page (guests only).
    pub const REGISTER: &str = "/register";

    /// Product list.
    pub const PRODUCTS: &str = "/products";

    /// Shopping cart.
    pub const CART: &str = "/cart";

    /// User profile.
    pub const PROFILE: &str = "/profile";
}

/// Keys of the persistent key-value storage.
pub mod storage_keys {
    /// The JSON-serialized auth token.
    pub const TOKEN: &str = "token";
}

/// Form validation rules and messages.
pub mod validation {
    /// Minimum password length, in characters.
    pub const PASSWORD_MIN_LENGTH: usize = 6;

    /// Username left empty.
    pub const USERNAME_REQUIRED: &str = "Username is required";

    /// Email left empty.
    pub const EMAIL_REQUIRED: &str = "Email is required";

    /// Password left empty.
    pub const PASSWORD_REQUIRED: &str = "Password is required";

    /// Password shorter than [`PASSWORD_MIN_LENGTH`].
    pub const PASSWORD_MIN_LENGTH_MESSAGE: &str = "Password must be at least 6 characters long";

    /// Confirmation left empty.
    pub const CONFIRM_PASSWORD_REQUIRED: &str = "Confirm Password is required";

    /// Password and confirmation differ.
    pub const PASSWORD_MISMATCH: &str = "Passwords do not match";
}

/// Titles and messages of user-facing notifications.
pub mod notifications {
    /// Message shown after a successful login.
    pub const LOGIN_SUCCESS: &str = "Login successful";

    /// Message shown after a successful registration.
    pub const REGISTER_SUCCESS: &str = "Registration successful";

    /// Message shown after a product was added to the cart.
    pub const ADD_TO_CART_SUCCESS: &str = "Product added to cart";

    /// Title of success notifications.
    pub const SUCCESS_TITLE: &str = "SUCCESS";

    /// Title of error notifications.
    pub const ERROR_TITLE: &str = "ERROR";

    /// Default time a notification stays visible, in milliseconds.
    pub const DEFAULT_DURATION_MS: u64 = 3000;
}

/// Server-side category names behind the UI category filter.
pub mod categories {
    /// Category of the `male` filter.
    pub const MENS_CLOTHING: &str = "men's clothing";

    /// Category of the `female` filter.
    pub const WOMENS_CLOTHING: &str = "women's clothing";

    /// Category of the `jewelery` filter.
    pub const JEWELERY: &str = "jewelery";

    /// Category of the `electronics` filter.
    pub const ELECTRONICS: &str = "electronics";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_constants() {
        assert_eq!(routes::HOME, "/");
        assert_eq!(routes::LOGIN, "/login");
        assert!(
            [routes::REGISTER, routes::PRODUCTS, routes::CART, routes::PROFILE]
                .iter()
                .all(|path| path.starts_with('/'))
        );
    }

    #[test]
    fn test_min_length_message_matches_rule() {
        assert!(
            validation::PASSWORD_MIN_LENGTH_MESSAGE
                .contains(&validation::PASSWORD_MIN_LENGTH.to_string())
        );
    }
}
