use std::borrow::Cow;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// A spinner registered on `progress`, so notifications printed through the
/// same `MultiProgress` land above it instead of tearing it.
pub fn spinner(progress: &MultiProgress, message: impl Into<Cow<'static, str>>) -> ProgressBar {
    let style = ProgressStyle::with_template("{spinner:.cyan} {msg:.dim}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ");

    let spinner = progress.add(ProgressBar::new_spinner().with_style(style).with_message(message));
    spinner.enable_steady_tick(TICK_INTERVAL);
    spinner
}
