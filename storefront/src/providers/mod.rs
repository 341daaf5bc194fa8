//! Storefront providers.
//!
//! Every capability the effects need from the outside world is a trait here:
//! the four REST resources, navigation and user notification. Reducers only
//! see these traits through the [`Environment`](crate::environment::Environment);
//! the live implementations live in [`clients`](crate::clients) and this
//! module, the test doubles in [`mocks`](crate::mocks).
//!
//! ```text
//! Reducer ──returns──▶ Effect ──awaits──▶ AuthApi / ProductApi / CartApi / ProfileApi
//!                         │
//!                         ├──▶ Navigator   (redirect to a route)
//!                         ├──▶ Notifier    (transient toast)
//!                         └──▶ Storage     (persisted token)
//! ```

pub mod api;
pub mod navigator;
pub mod notifier;

pub use api::{AuthApi, CartApi, ProductApi, ProfileApi};
pub use navigator::{HistoryNavigator, Navigator};
pub use notifier::{Notification, NotificationKind, Notifier, TracingNotifier};
