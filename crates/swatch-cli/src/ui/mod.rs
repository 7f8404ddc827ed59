//! Terminal output helpers.
//!
//! Status lines go to stderr so command output on stdout (JSON, rendered
//! templates) stays pipeable.

mod format;
mod messages;
mod spinner;

pub use format::{format_duration, format_size, print_build_summary};
pub use messages::{error, info, success, warning};
pub use spinner::Spinner;

/// Detects common CI environment variables.
pub fn is_ci() -> bool {
    ["CI", "GITHUB_ACTIONS", "GITLAB_CI", "CIRCLECI", "TRAVIS"]
        .iter()
        .any(|var| std::env::var_os(var).is_some())
}

/// `NO_COLOR` disables colors, `FORCE_COLOR` forces them, otherwise stderr
/// must be a terminal.
pub fn should_use_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::user_attended_stderr()
}

/// Decide once whether status output is colored.
pub fn init_colors(no_color: bool) {
    let enabled = !no_color && should_use_color();
    console::set_colors_enabled(enabled);
    console::set_colors_enabled_stderr(enabled);
}

pub(crate) fn colors_enabled() -> bool {
    console::colors_enabled_stderr()
}
