//! Route table and guarded navigation.
//!
//! # Routes
//!
//! - `/login`, `/register` - guest only
//! - `/` - layout; children `/products`, `/products/:id`, `/cart`, `/profile`,
//!   all auth only

use crate::constants::routes;
use crate::error::RouterError;
use crate::guards::{AuthStatus, Guard, GuardOutcome};
use crate::providers::Navigator;
use crate::types::ProductId;
use std::fmt;

/// Default bound on consecutive redirects of one navigation.
pub const MAX_REDIRECTS: usize = 5;

/// A page of the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/login`
    Login,
    /// `/register`
    Register,
    /// `/`
    Layout,
    /// `/products`
    Products,
    /// `/products/:id`
    ProductDetail(ProductId),
    /// `/cart`
    Cart,
    /// `/profile`
    Profile,
}

impl Route {
    /// Parse a path; query strings, fragments and trailing slashes are ignored.
    ///
    /// ```
    /// use storefront::router::Route;
    ///
    /// assert_eq!(Route::parse("/products/3"), Some(Route::ProductDetail(3)));
    /// assert_eq!(Route::parse("/cart/"), Some(Route::Cart));
    /// assert_eq!(Route::parse("/admin"), None);
    /// ```
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');

        let route = match trimmed {
            "" => Self::Layout,
            routes::LOGIN => Self::Login,
            routes::REGISTER => Self::Register,
            routes::PRODUCTS => Self::Products,
            routes::CART => Self::Cart,
            routes::PROFILE => Self::Profile,
            other => {
                let id = other.strip_prefix(routes::PRODUCTS)?.strip_prefix('/')?;
                Self::ProductDetail(id.parse().ok()?)
            },
        };

        Some(route)
    }

    /// The route's canonical path.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Login => routes::LOGIN.to_string(),
            Self::Register => routes::REGISTER.to_string(),
            Self::Layout => routes::HOME.to_string(),
            Self::Products => routes::PRODUCTS.to_string(),
            Self::ProductDetail(id) => format!("{}/{id}", routes::PRODUCTS),
            Self::Cart => routes::CART.to_string(),
            Self::Profile => routes::PROFILE.to_string(),
        }
    }

    /// The guard in front of the route.
    #[must_use]
    pub const fn guard(&self) -> Guard {
        match self {
            Self::Login | Self::Register => Guard::Guest,
            Self::Layout
            | Self::Products
            | Self::ProductDetail(_)
            | Self::Cart
            | Self::Profile => Guard::Auth,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Outcome of a successful navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// The requested route was entered.
    Allowed(Route),
    /// Guards sent the navigation elsewhere.
    Redirected {
        /// The requested route
        from: Route,
        /// The route finally entered
        to: Route,
    },
}

impl Navigation {
    /// The route that was entered.
    #[must_use]
    pub const fn route(&self) -> Route {
        match self {
            Self::Allowed(route) | Self::Redirected { to: route, .. } => *route,
        }
    }
}

/// Guarded navigation on top of a [`Navigator`].
#[derive(Debug, Clone)]
pub struct Router<N> {
    navigator: N,
    max_redirects: usize,
}

impl<N: Navigator> Router<N> {
    /// Router driving `navigator`.
    #[must_use]
    pub const fn new(navigator: N) -> Self {
        Self {
            navigator,
            max_redirects: MAX_REDIRECTS,
        }
    }

    /// Override the redirect bound.
    #[must_use]
    pub const fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    /// The driven navigator.
    pub const fn navigator(&self) -> &N {
        &self.navigator
    }

    /// Navigate to `path`.
    ///
    /// Every route on the way, redirect targets included, has its guard
    /// evaluated exactly once. The navigator only sees the route finally
    /// entered.
    ///
    /// # Errors
    ///
    /// - [`RouterError::NotFound`]: `path` names no route
    /// - [`RouterError::RedirectLoop`]: guards kept redirecting
    #[tracing::instrument(skip(self, status), name = "router_navigate")]
    pub async fn navigate<S: AuthStatus>(
        &self,
        path: &str,
        status: &S,
    ) -> Result<Navigation, RouterError> {
        let requested =
            Route::parse(path).ok_or_else(|| RouterError::NotFound(path.to_string()))?;

        let mut current = requested;
        let mut hops = 0;

        loop {
            match current.guard().evaluate(status).await {
                GuardOutcome::Allow => break,
                GuardOutcome::Redirect(target) => {
                    hops += 1;
                    if hops > self.max_redirects {
                        tracing::warn!(path, hops, "Navigation redirected too often");
                        return Err(RouterError::RedirectLoop {
                            path: path.to_string(),
                            hops,
                        });
                    }

                    current = Route::parse(target)
                        .ok_or_else(|| RouterError::NotFound(target.to_string()))?;
                    tracing::debug!(from = %requested, to = %current, "Redirecting");
                },
            }
        }

        self.navigator.navigate_by_url(&current.path());
        tracing::info!(route = %current, "Navigated");

        if current == requested {
            Ok(Navigation::Allowed(current))
        } else {
            Ok(Navigation::Redirected {
                from: requested,
                to: current,
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;
    use crate::mocks::RecordingNavigator;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Status that flips on every read.
    struct FlippingStatus(AtomicBool);

    impl AuthStatus for FlippingStatus {
        async fn is_logged_in(&self) -> bool {
            !self.0.fetch_xor(true, Ordering::SeqCst)
        }
    }

    #[test]
    fn test_parse_and_path() {
        for route in [
            Route::Login,
            Route::Register,
            Route::Layout,
            Route::Products,
            Route::ProductDetail(42),
            Route::Cart,
            Route::Profile,
        ] {
            assert_eq!(Route::parse(&route.path()), Some(route));
        }

        assert_eq!(Route::parse("/login?next=/cart"), Some(Route::Login));
        assert_eq!(Route::parse("/products/abc"), None);
        assert_eq!(Route::parse("/products/1/reviews"), None);
    }

    #[test]
    fn test_guards_per_route() {
        assert_eq!(Route::Login.guard(), Guard::Guest);
        assert_eq!(Route::Register.guard(), Guard::Guest);
        assert_eq!(Route::Cart.guard(), Guard::Auth);
        assert_eq!(Route::ProductDetail(1).guard(), Guard::Auth);
        assert_eq!(Route::Layout.guard(), Guard::Auth);
    }

    #[tokio::test]
    async fn test_anonymous_user_is_sent_to_login() {
        let router = Router::new(RecordingNavigator::default());

        let navigation = router.navigate("/cart", &false).await.unwrap();

        assert_eq!(
            navigation,
            Navigation::Redirected {
                from: Route::Cart,
                to: Route::Login
            }
        );
        assert_eq!(router.navigator().visits(), vec!["/login"]);
    }

    #[tokio::test]
    async fn test_logged_in_user_is_sent_home_from_login() {
        let router = Router::new(RecordingNavigator::default());

        let navigation = router.navigate("/register", &true).await.unwrap();

        assert_eq!(navigation.route(), Route::Layout);
        assert_eq!(router.navigator().visits(), vec!["/"]);
    }

    #[tokio::test]
    async fn test_allowed_navigation() {
        let router = Router::new(RecordingNavigator::default());

        let navigation = router.navigate("/products/7", &true).await.unwrap();

        assert_eq!(navigation, Navigation::Allowed(Route::ProductDetail(7)));
        assert_eq!(router.navigator().visits(), vec!["/products/7"]);
    }

    #[tokio::test]
    async fn test_unknown_path() {
        let router = Router::new(RecordingNavigator::default());

        let error = router.navigate("/admin", &true).await.unwrap_err();

        assert_eq!(error, RouterError::NotFound("/admin".into()));
        assert!(router.navigator().visits().is_empty());
    }

    #[tokio::test]
    async fn test_redirect_loop_is_bounded() {
        let router = Router::new(RecordingNavigator::default()).with_max_redirects(3);
        // Reads false, true, false, ... so every guard redirects
        let status = FlippingStatus(AtomicBool::new(true));

        let error = router.navigate("/cart", &status).await.unwrap_err();

        assert_eq!(
            error,
            RouterError::RedirectLoop {
                path: "/cart".into(),
                hops: 4
            }
        );
        assert!(router.navigator().visits().is_empty());
    }
}
