//! Conversion of CLI errors into miette reports.

use miette::{MietteDiagnostic, Report};

use crate::error::CliError;

/// Convert a [`CliError`] into a report for `main`.
///
/// Errors carrying a hint (`\n\nHint: ...`) get it as the diagnostic help.
pub fn cli_error_to_miette(err: CliError) -> Report {
    let code = match &err {
        CliError::Config(_) => Some("swatch::config"),
        CliError::Build(_) => Some("swatch::build"),
        CliError::A11yIssues { .. } => Some("swatch::a11y"),
        CliError::ToolFailed { .. } => Some("swatch::tool"),
        _ => None,
    };

    let text = err.to_string();
    let (message, hint) = match text.split_once("\n\nHint: ") {
        Some((message, hint)) => (message.to_string(), Some(hint.to_string())),
        None => (text, None),
    };

    let mut diagnostic = MietteDiagnostic::new(message);
    if let Some(code) = code {
        diagnostic = diagnostic.with_code(code);
    }
    if let Some(hint) = hint {
        diagnostic = diagnostic.with_help(hint);
    }
    Report::new(diagnostic)
}
