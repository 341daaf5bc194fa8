//! Feature slices.
//!
//! Each feature owns one part of the state tree, the actions that change it
//! and the reducer that applies them. Request actions return a cancellable
//! effect keyed by the action's own type name, so a newer request of the same
//! kind supersedes the one still in flight.
//!
//! | Feature | State | Actions |
//! |---|---|---|
//! | [`auth`] | token, user id | login, register, session restore, logout |
//! | [`product`] | catalogue, single product, category filter | load list, load by id, filter |
//! | [`cart`] | cart entries | list carts, add entry |
//! | [`profile`] | user profile | load profile |

pub mod auth;
pub mod cart;
pub mod product;
pub mod profile;

use crate::constants::notifications;
use crate::environment::Environment;
use crate::providers::{Notification, Notifier};

/// Raise a success toast.
pub(crate) fn toast_success<E: Environment>(env: &E, message: &str) {
    env.notifier().notify(Notification::success(
        message,
        notifications::SUCCESS_TITLE,
        env.toast_duration(),
        env.clock().now(),
    ));
}

/// Raise an error toast.
pub(crate) fn toast_error<E: Environment>(env: &E, message: &str) {
    env.notifier().notify(Notification::danger(
        message,
        notifications::ERROR_TITLE,
        env.toast_duration(),
        env.clock().now(),
    ));
}
