//! Formatting for sizes, durations and the build summary.

use std::time::Duration;

use console::Term;
use owo_colors::OwoColorize;
use swatch_bundler::PluginOutcome;

use super::colors_enabled;

/// ```
/// use swatch_cli::ui::format_size;
///
/// assert_eq!(format_size(0), "0 B");
/// assert_eq!(format_size(1536), "1.50 KB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.2} {}", UNITS[unit])
    }
}

/// ```
/// use std::time::Duration;
/// use swatch_cli::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();
    if total_ms < 1000 {
        format!("{total_ms}ms")
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// One line per plugin, as printed by [`print_build_summary`].
pub(crate) fn summary_line(outcome: &PluginOutcome) -> String {
    match &outcome.result {
        Ok(report) => {
            let mut parts = vec![format!("{} written", report.written)];
            if report.removed > 0 {
                parts.push(format!("{} moved", report.removed));
            }
            if report.skipped > 0 {
                parts.push(format!("{} skipped", report.skipped));
            }
            if report.failed > 0 {
                parts.push(format!("{} failed", report.failed));
            }
            format!("{:<10} {}", outcome.name, parts.join(", "))
        }
        Err(err) => format!("{:<10} error: {err}", outcome.name),
    }
}

/// Print the per-plugin results of a build to stderr.
///
/// Plugins without any effect (transform-only steps) are left out.
pub fn print_build_summary(entries: usize, outcomes: &[PluginOutcome], duration: Duration) {
    let width = (Term::stderr().size().1 as usize).clamp(20, 80);
    let colored = colors_enabled();

    if colored {
        eprintln!("\n{}", "Build Summary".bold().underline());
    } else {
        eprintln!("\nBuild Summary");
    }
    eprintln!("{}", "─".repeat(width));
    eprintln!("  {:<10} {entries} routed", "entries");

    for outcome in outcomes {
        let idle = matches!(&outcome.result, Ok(report) if *report == Default::default());
        if idle {
            continue;
        }
        let line = summary_line(outcome);
        let failed = match &outcome.result {
            Ok(report) => !report.is_clean(),
            Err(_) => true,
        };
        match (colored, failed) {
            (true, true) => eprintln!("  {} {}", "▸".red(), line.red()),
            (true, false) => eprintln!("  {} {}", "▸".blue(), line),
            (false, _) => eprintln!("  ▸ {line}"),
        }
    }

    eprintln!("{}", "─".repeat(width));
    eprintln!("  done in {}", format_duration(duration));
}
