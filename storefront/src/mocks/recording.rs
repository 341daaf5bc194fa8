//! Navigator and notifier that record what effects asked of them.

use crate::constants::routes;
use crate::providers::{Navigator, Notification, Notifier};
use std::sync::{Arc, Mutex, PoisonError};

/// Navigator recording every visited URL.
#[derive(Debug, Clone)]
pub struct RecordingNavigator {
    visits: Arc<Mutex<Vec<String>>>,
    current: Arc<Mutex<String>>,
}

impl RecordingNavigator {
    /// Navigator positioned at `initial`; the initial location is not a visit.
    #[must_use]
    pub fn new(initial: &str) -> Self {
        Self {
            visits: Arc::new(Mutex::new(Vec::new())),
            current: Arc::new(Mutex::new(initial.to_string())),
        }
    }

    /// URLs navigated to, oldest first.
    #[must_use]
    pub fn visits(&self) -> Vec<String> {
        self.visits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for RecordingNavigator {
    fn default() -> Self {
        Self::new(routes::HOME)
    }
}

impl Navigator for RecordingNavigator {
    fn navigate_by_url(&self, url: &str) {
        self.visits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = url.to_string();
    }

    fn current_url(&self) -> String {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Notifier recording every notification.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications raised so far, oldest first.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}
