//! # Storefront
//!
//! A storefront client (login, catalogue, cart, profile) built on the
//! reducer/effect store of `storefront-core` and `storefront-runtime`.
//!
//! ## Architecture
//!
//! ```text
//! Action → Reducer → (State, Effects) → Effect Execution → More Actions
//! ```
//!
//! - [`features`]: one state slice, action enum and reducer per feature
//! - [`app`]: the composed state tree and reducer, plus the root effects
//!   (session restore at startup, logout)
//! - [`selectors`]: pure derivations, memoized where consumers share them
//! - [`guards`] and [`router`]: guarded navigation
//! - [`environment`]: every side effect the reducers may ask for
//! - [`clients`] and [`storage`]: the REST API and the token storage
//! - [`storefront`]: the facade the CLI drives
//!
//! ## Example
//!
//! ```rust,ignore
//! use storefront::{Config, LiveEnvironment, Storefront, forms::LoginForm};
//!
//! let config = Config::from_env()?;
//! let storefront = Storefront::bootstrap(LiveEnvironment::from_config(&config)?, &config).await?;
//!
//! storefront.login(LoginForm::new("johnd", "m38rmF$")).await?;
//! let products = storefront.load_products().await?;
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

pub mod app;
pub mod clients;
pub mod config;
pub mod constants;
pub mod environment;
pub mod error;
pub mod features;
pub mod forms;
pub mod guards;
pub mod providers;
pub mod router;
pub mod selectors;
pub mod storage;
pub mod storefront;
pub mod types;
pub mod utils;

#[cfg(feature = "test-utils")]
pub mod mocks;

pub use app::{AppAction, AppReducer, AppState, RootAction};
pub use clients::RestClient;
pub use config::Config;
pub use environment::{Environment, LiveEnvironment};
pub use error::{ApiError, Result, StorefrontError};
pub use storefront::{AppStore, Storefront};
