//! User profile.

use crate::environment::Environment;
use crate::providers::ProfileApi;
use crate::types::{Profile, UserId};
use serde::Serialize;
use std::marker::PhantomData;
use storefront_core::{cancellable, effect::Effect, reducer::Reducer, smallvec, SmallVec};
use storefront_macros::Action;

/// Profile state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileState {
    /// The loaded profile.
    pub profile: Option<Profile>,
    /// Message of the last failed request.
    pub error: Option<String>,
    /// A request is in flight.
    pub is_loading: bool,
}

/// Profile actions.
#[derive(Action, Clone, Debug, PartialEq, Eq)]
#[action(source = "Profile")]
pub enum ProfileAction {
    /// Fetch a user's profile.
    GetProfile {
        /// User id
        id: UserId,
    },

    /// Profile fetched.
    #[terminal]
    GetProfileSuccess {
        /// The profile
        profile: Profile,
    },

    /// Profile request failed.
    #[terminal]
    GetProfileFailure {
        /// Human-readable message
        error: String,
    },
}

/// Reducer of [`ProfileState`].
pub struct ProfileReducer<E> {
    _env: PhantomData<fn() -> E>,
}

impl<E> ProfileReducer<E> {
    /// Create the reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self { _env: PhantomData }
    }
}

impl<E> Default for ProfileReducer<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for ProfileReducer<E> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<E: Environment> Reducer for ProfileReducer<E> {
    type State = ProfileState;
    type Action = ProfileAction;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut ProfileState,
        action: ProfileAction,
        env: &E,
    ) -> SmallVec<[Effect<ProfileAction>; 4]> {
        let id = action.action_type();

        match action {
            ProfileAction::GetProfile { id: user_id } => {
                state.is_loading = true;

                let env = env.clone();
                smallvec![cancellable! {
                    id: id,
                    async {
                        match env.profile_api().get_profile(user_id).await {
                            Ok(profile) => Some(ProfileAction::GetProfileSuccess { profile }),
                            Err(error) => {
                                tracing::warn!(%error, user_id, "Loading profile failed");
                                Some(ProfileAction::GetProfileFailure { error: error.to_string() })
                            },
                        }
                    }
                }]
            },

            ProfileAction::GetProfileSuccess { profile } => {
                state.profile = Some(profile);
                state.is_loading = false;
                smallvec![Effect::None]
            },

            ProfileAction::GetProfileFailure { error } => {
                state.error = Some(error);
                state.is_loading = false;
                smallvec![Effect::None]
            },
        }
    }
}
