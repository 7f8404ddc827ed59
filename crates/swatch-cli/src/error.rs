//! Error handling for the swatch CLI.
//!
//! Library errors convert into [`CliError`] through `#[from]`; [`ResultExt`]
//! attaches paths and hints on the way up. `main` turns the final error into a
//! miette report.
//!
//! ```rust,no_run
//! use std::path::Path;
//! use swatch_cli::error::{Result, ResultExt};
//!
//! fn read_data(path: &Path) -> Result<String> {
//!     std::fs::read_to_string(path)
//!         .with_path(path)
//!         .with_hint("Pass --data with a YAML or JSON file")
//! }
//! ```

mod report;

use std::path::PathBuf;

use thiserror::Error;

pub use report::cli_error_to_miette;

#[derive(Debug, Error)]
pub enum CliError {
    /// Project extensions or descriptor problems
    #[error("Configuration error: {0}")]
    Config(#[from] swatch_config::ConfigError),

    /// Routing, template or plugin failures
    #[error("Build error: {0}")]
    Build(#[from] swatch_bundler::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The accessibility tool could not be started or produced no report
    #[error("Could not run {tool}: {message}\n\nHint: Install it with `npm install -g {tool}` or pass the binary on PATH")]
    ToolFailed { tool: String, message: String },

    /// Accessibility issues remain after ignores
    #[error("{count} accessibility issue(s) found in {components} component(s)")]
    A11yIssues { count: usize, components: usize },

    #[error(transparent)]
    Other(#[from] anyhow::Error),

    #[error("{0}")]
    Custom(String),
}

pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Context helpers for fallible operations.
pub trait ResultExt<T> {
    /// Replace a not-found I/O error with [`CliError::FileNotFound`] for `path`.
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T>;

    /// Append a hint line to the error message.
    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T>;

    /// Prefix the error message.
    fn context(self, msg: impl std::fmt::Display) -> Result<T>;
}

impl<T, E: Into<CliError>> ResultExt<T> for std::result::Result<T, E> {
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T> {
        self.map_err(|e| match e.into() {
            CliError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
                CliError::FileNotFound(path.as_ref().to_path_buf())
            }
            other => other,
        })
    }

    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{err}\n\nHint: {hint}"))
        })
    }

    fn context(self, msg: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{msg}: {err}"))
        })
    }
}
