//! Route guards.
//!
//! A guard reads the login status once per navigation attempt and either lets
//! the navigation through or names the page to go to instead.

use crate::app::{AppAction, AppReducer, AppState};
use crate::constants::routes;
use crate::environment::Environment;
use crate::selectors::select_is_logged_in;
use std::future::Future;
use storefront_runtime::Store;

/// Source of the current login status.
///
/// Reading it may need the store's lock, hence async.
pub trait AuthStatus: Send + Sync {
    /// Whether a session is active.
    fn is_logged_in(&self) -> impl Future<Output = bool> + Send;
}

impl<E: Environment> AuthStatus for Store<AppState, AppAction, E, AppReducer<E>> {
    async fn is_logged_in(&self) -> bool {
        self.state(|state| select_is_logged_in(&state.auth)).await
    }
}

impl AuthStatus for bool {
    async fn is_logged_in(&self) -> bool {
        *self
    }
}

/// Guards a route can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Logged-in users only; others go to the login page.
    Auth,
    /// Anonymous users only; logged-in users go home.
    Guest,
}

/// Result of a guard evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Enter the route.
    Allow,
    /// Go to this path instead.
    Redirect(&'static str),
}

impl Guard {
    /// Evaluate the guard against `status`.
    pub async fn evaluate<S: AuthStatus>(self, status: &S) -> GuardOutcome {
        let logged_in = status.is_logged_in().await;

        let outcome = match (self, logged_in) {
            (Self::Auth, true) | (Self::Guest, false) => GuardOutcome::Allow,
            (Self::Auth, false) => GuardOutcome::Redirect(routes::LOGIN),
            (Self::Guest, true) => GuardOutcome::Redirect(routes::HOME),
        };

        tracing::debug!(guard = ?self, logged_in, ?outcome, "Guard evaluated");
        outcome
    }
}

/// Allow only logged-in users.
pub async fn auth_guard<S: AuthStatus>(status: &S) -> GuardOutcome {
    Guard::Auth.evaluate(status).await
}

/// Allow only anonymous users.
pub async fn guest_guard<S: AuthStatus>(status: &S) -> GuardOutcome {
    Guard::Guest.evaluate(status).await
}
