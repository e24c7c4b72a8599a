use indicatif::MultiProgress;
use owo_colors::OwoColorize;
use planning_core::{Notification, NotificationKind, Notifier};

/// Prints notifications as one-line toasts above any running spinner.
pub struct TerminalNotifier {
    progress: MultiProgress,
}

impl TerminalNotifier {
    pub fn new(progress: MultiProgress) -> Self {
        TerminalNotifier { progress }
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        let line = match notification.kind {
            NotificationKind::Success => format!(
                "{} {}",
                notification.title.green().bold(),
                notification.message.green()
            ),
            NotificationKind::Error => format!(
                "{} {}",
                notification.title.red().bold(),
                notification.message.red()
            ),
        };
        self.progress.suspend(|| println!("{line}"));
    }
}
