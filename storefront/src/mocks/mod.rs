//! Mock provider implementations for testing.
//!
//! In-memory, scriptable stand-ins for every capability of the
//! [`Environment`](crate::environment::Environment). Responses can be queued
//! with a delay, which is how the latest-wins tests make an older request
//! finish after a newer one.

pub mod api;
pub mod environment;
pub mod fixtures;
pub mod recording;

pub use api::{Endpoint, MockAuthApi, MockCartApi, MockProductApi, MockProfileApi};
pub use environment::MockEnvironment;
pub use recording::{RecordingNavigator, RecordingNotifier};
