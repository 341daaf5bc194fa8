//! Navigation capability.

use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;

/// Redirects the user to a route.
///
/// Effects call this after a successful login, registration or logout. The
/// URL is taken as given; guarding happens in the [`Router`](crate::router::Router).
pub trait Navigator: Send + Sync + 'static {
    /// Move to `url`.
    fn navigate_by_url(&self, url: &str);

    /// The current location.
    fn current_url(&self) -> String;
}

/// In-process navigator keeping a history of visited URLs.
///
/// The current location is published on a `watch` channel so a front end can
/// follow redirects made by effects.
#[derive(Debug, Clone)]
pub struct HistoryNavigator {
    location: Arc<watch::Sender<String>>,
    history: Arc<Mutex<Vec<String>>>,
}

impl HistoryNavigator {
    /// Create a navigator positioned at `initial`.
    #[must_use]
    pub fn new(initial: impl Into<String>) -> Self {
        let initial = initial.into();
        let (location, _) = watch::channel(initial.clone());

        Self {
            location: Arc::new(location),
            history: Arc::new(Mutex::new(vec![initial])),
        }
    }

    /// Follow location changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.location.subscribe()
    }

    /// Every location visited so far, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for HistoryNavigator {
    fn default() -> Self {
        Self::new(crate::constants::routes::HOME)
    }
}

impl Navigator for HistoryNavigator {
    fn navigate_by_url(&self, url: &str) {
        tracing::info!(url, "Navigating");
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());
        self.location.send_replace(url.to_string());
    }

    fn current_url(&self) -> String {
        self.location.borrow().clone()
    }
}
