//! User notification capability.
//!
//! Notifications are transient toasts: a kind, a title, a message and how long
//! they stay visible.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Something worked.
    Success,
    /// Something failed.
    Danger,
}

/// A transient user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Severity.
    pub kind: NotificationKind,
    /// Short title (`"SUCCESS"`, `"ERROR"`).
    pub title: String,
    /// Body text.
    pub message: String,
    /// How long the toast stays visible.
    pub duration: Duration,
    /// When it was raised.
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    /// A success toast.
    #[must_use]
    pub fn success(
        message: impl Into<String>,
        title: impl Into<String>,
        duration: Duration,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: title.into(),
            message: message.into(),
            duration,
            timestamp,
        }
    }

    /// An error toast.
    #[must_use]
    pub fn danger(
        message: impl Into<String>,
        title: impl Into<String>,
        duration: Duration,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            kind: NotificationKind::Danger,
            ..Self::success(message, title, duration, timestamp)
        }
    }
}

/// Shows notifications to the user.
pub trait Notifier: Send + Sync + 'static {
    /// Show `notification`.
    fn notify(&self, notification: Notification);
}

/// Notifier that writes toasts to the tracing log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Success => tracing::info!(
                title = %notification.title,
                duration_ms = notification.duration.as_millis(),
                "{}",
                notification.message
            ),
            NotificationKind::Danger => tracing::warn!(
                title = %notification.title,
                duration_ms = notification.duration.as_millis(),
                "{}",
                notification.message
            ),
        }
    }
}
