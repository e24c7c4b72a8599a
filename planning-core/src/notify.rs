//! User-visible outcome notifications.

use std::fmt;

pub const REFRESH_SUCCESS_TITLE: &str = "Et hop !";
pub const REFRESH_SUCCESS_MESSAGE: &str = "Planning actualisé avec succès";
pub const REFRESH_FAILURE_TITLE: &str = "Oups !";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn success(title: &str, message: &str) -> Self {
        Notification {
            kind: NotificationKind::Success,
            title: title.to_string(),
            message: message.to_string(),
        }
    }

    pub fn error(title: &str, message: &str) -> Self {
        Notification {
            kind: NotificationKind::Error,
            title: title.to_string(),
            message: message.to_string(),
        }
    }

    pub fn refresh_succeeded() -> Self {
        Self::success(REFRESH_SUCCESS_TITLE, REFRESH_SUCCESS_MESSAGE)
    }

    pub fn refresh_failed(message: &str) -> Self {
        Self::error(REFRESH_FAILURE_TITLE, message)
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.title, self.message)
    }
}

/// Receives notifications (toast, terminal line, desktop popup...).
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Sends notifications to the log only.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Success => {
                tracing::info!(title = %notification.title, "{}", notification.message)
            }
            NotificationKind::Error => {
                tracing::warn!(title = %notification.title, "{}", notification.message)
            }
        }
    }
}
