//! Authentication: login, registration, session restore and logout.
//!
//! The token is the only piece of auth state that outlives the process: login
//! persists it, logout removes it, and the store restores it at startup.

use crate::constants::{notifications, routes};
use crate::environment::Environment;
use crate::features::{toast_error, toast_success};
use crate::providers::{AuthApi, Navigator};
use crate::types::{LoginRequest, RegisterRequest, UserId};
use serde::Serialize;
use std::marker::PhantomData;
use storefront_core::{cancellable, effect::Effect, reducer::Reducer, smallvec, SmallVec};
use storefront_macros::Action;

/// Authentication state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuthState {
    /// Session token; present while logged in.
    pub token: Option<String>,
    /// Id of the logged-in user, when known.
    pub user_id: Option<UserId>,
    /// Message of the last failed request.
    pub error: Option<String>,
    /// A login or registration is in flight.
    pub is_loading: bool,
}

impl AuthState {
    /// State of a session resumed with `token`.
    #[must_use]
    pub fn with_token(token: Option<String>) -> Self {
        Self {
            token,
            ..Self::default()
        }
    }
}

/// Authentication actions.
#[derive(Action, Clone, Debug, PartialEq, Eq)]
#[action(source = "Auth")]
pub enum AuthAction {
    /// Log in with credentials.
    Login {
        /// Login name
        username: String,
        /// Password
        password: String,
    },

    /// Credentials accepted.
    #[terminal]
    LoginSuccess {
        /// Issued session token
        token: String,
    },

    /// Login failed.
    #[terminal]
    LoginFailure {
        /// Human-readable message
        error: String,
    },

    /// Create an account.
    Register {
        /// Login name
        username: String,
        /// Email address
        email: String,
        /// Password
        password: String,
        /// Password confirmation
        confirm_password: String,
    },

    /// Account created.
    #[terminal]
    RegisterSuccess,

    /// Registration failed.
    #[terminal]
    RegisterFailure {
        /// Human-readable message
        error: String,
    },

    /// Resume a session from a persisted token.
    RestoreSession {
        /// The persisted token
        token: String,
    },

    /// End the session.
    Logout,
}

/// Reducer of [`AuthState`].
///
/// On success the login effect persists the token, navigates home and raises
/// a toast before dispatching [`AuthAction::LoginSuccess`]. Logout's own side
/// effects (forgetting the token, redirecting to the login page) run at the
/// application level, see [`AppReducer`](crate::app::AppReducer).
pub struct AuthReducer<E> {
    _env: PhantomData<fn() -> E>,
}

impl<E> AuthReducer<E> {
    /// Create the reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self { _env: PhantomData }
    }
}

impl<E> Default for AuthReducer<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for AuthReducer<E> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<E: Environment> Reducer for AuthReducer<E> {
    type State = AuthState;
    type Action = AuthAction;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut AuthState,
        action: AuthAction,
        env: &E,
    ) -> SmallVec<[Effect<AuthAction>; 4]> {
        let id = action.action_type();

        match action {
            AuthAction::Login { username, password } => {
                state.is_loading = true;
                state.error = None;

                let env = env.clone();
                let request = LoginRequest { username, password };

                smallvec![cancellable! {
                    id: id,
                    async {
                        match env.auth_api().login(&request).await {
                            Ok(response) => {
                                if let Err(error) = env.storage().save_token(&response.token) {
                                    tracing::warn!(%error, "Failed to persist token");
                                }
                                env.navigator().navigate_by_url(routes::HOME);
                                toast_success(&env, notifications::LOGIN_SUCCESS);
                                tracing::info!(username = %request.username, "Logged in");

                                Some(AuthAction::LoginSuccess { token: response.token })
                            },
                            Err(error) => {
                                let error = error.to_string();
                                tracing::warn!(%error, "Login failed");
                                toast_error(&env, &error);

                                Some(AuthAction::LoginFailure { error })
                            },
                        }
                    }
                }]
            },

            AuthAction::LoginSuccess { token } => {
                state.token = Some(token);
                state.is_loading = false;
                smallvec![Effect::None]
            },

            AuthAction::LoginFailure { error } | AuthAction::RegisterFailure { error } => {
                state.error = Some(error);
                state.is_loading = false;
                smallvec![Effect::None]
            },

            AuthAction::Register {
                username,
                email,
                password,
                confirm_password,
            } => {
                state.is_loading = true;
                state.error = None;

                let env = env.clone();
                let request = RegisterRequest {
                    username,
                    email,
                    password,
                    confirm_password,
                };

                smallvec![cancellable! {
                    id: id,
                    async {
                        match env.auth_api().register(&request).await {
                            Ok(_) => {
                                env.navigator().navigate_by_url(routes::LOGIN);
                                toast_success(&env, notifications::REGISTER_SUCCESS);
                                tracing::info!(username = %request.username, "Registered");

                                Some(AuthAction::RegisterSuccess)
                            },
                            Err(error) => {
                                let error = error.to_string();
                                tracing::warn!(%error, "Registration failed");
                                toast_error(&env, &error);

                                Some(AuthAction::RegisterFailure { error })
                            },
                        }
                    }
                }]
            },

            AuthAction::RegisterSuccess => {
                state.is_loading = false;
                smallvec![Effect::None]
            },

            AuthAction::RestoreSession { token } => {
                state.token = Some(token);
                smallvec![Effect::None]
            },

            AuthAction::Logout => {
                *state = AuthState::default();
                smallvec![Effect::None]
            },
        }
    }
}
