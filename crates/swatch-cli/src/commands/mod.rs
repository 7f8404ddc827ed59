//! Command implementations.
//!
//! Each subcommand lives in its own module and exposes an `execute` function
//! taking its parsed arguments and the global options.

pub mod a11y;
pub mod build;
pub mod config;
pub mod entries;
pub mod render;
pub(crate) mod utils;
pub mod watch;

use std::path::PathBuf;

use crate::ui;

pub use a11y::execute as a11y_execute;
pub use build::execute as build_execute;
pub use config::execute as config_execute;
pub use entries::execute as entries_execute;
pub use render::execute as render_execute;
pub use watch::execute as watch_execute;

/// Flags shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Project root override
    pub cwd: Option<PathBuf>,
    /// Only errors are printed
    pub quiet: bool,
}

impl GlobalOptions {
    pub fn for_project(dir: impl Into<PathBuf>) -> Self {
        Self {
            cwd: Some(dir.into()),
            quiet: true,
        }
    }

    pub(crate) fn info(&self, message: &str) {
        if !self.quiet {
            ui::info(message);
        }
    }

    pub(crate) fn success(&self, message: &str) {
        if !self.quiet {
            ui::success(message);
        }
    }

    pub(crate) fn warning(&self, message: &str) {
        if !self.quiet {
            ui::warning(message);
        }
    }
}
