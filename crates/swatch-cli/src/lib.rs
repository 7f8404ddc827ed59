//! Swatch CLI - design-system asset routing from the command line.
//!
//! - [`cli`] - argument definitions (clap derive)
//! - [`commands`] - one module per subcommand
//! - [`error`] - `CliError` and conversion to miette reports
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - status lines, spinners and summaries

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, Result, ResultExt};
