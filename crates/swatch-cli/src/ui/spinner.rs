//! Spinner for steps without a known length.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

use super::colors_enabled;

pub struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    /// Start a spinner. It stays hidden when stderr is not a terminal or in CI.
    pub fn new(message: &str) -> Self {
        let pb = if console::user_attended_stderr() && !super::is_ci() {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
                pb.set_style(style.tick_strings(&["◐", "◓", "◑", "◒", "●"]));
            }
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        } else {
            ProgressBar::hidden()
        };
        pb.set_message(message.to_string());

        Self { pb }
    }

    pub fn set_message(&self, message: &str) {
        self.pb.set_message(message.to_string());
    }

    pub fn finish(&self, message: &str) {
        if self.pb.is_hidden() {
            super::success(message);
        } else if colors_enabled() {
            self.pb.finish_with_message(format!("{} {}", "✓".green(), message));
        } else {
            self.pb.finish_with_message(format!("✓ {message}"));
        }
    }

    pub fn fail(&self, message: &str) {
        if self.pb.is_hidden() {
            super::error(message);
        } else if colors_enabled() {
            self.pb.finish_with_message(format!("{} {}", "✗".red(), message.red()));
        } else {
            self.pb.finish_with_message(format!("✗ {message}"));
        }
    }
}
