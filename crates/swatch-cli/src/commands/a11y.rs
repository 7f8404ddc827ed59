//! `swatch a11y`: accessibility lint of component-library stories via pa11y.

use owo_colors::OwoColorize;
use serde::Deserialize;
use tokio::process::Command;

use super::{utils, GlobalOptions};
use crate::cli::A11yArgs;
use crate::error::{CliError, Result};
use crate::ui;

const DEFAULT_SERVER_URL: &str = "http://localhost:6006";
const DEFAULT_RUNNER: &str = "axe";

/// One entry of pa11y's JSON report.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Issue {
    pub code: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub selector: String,
    #[serde(default)]
    pub context: Option<String>,
}

pub async fn execute(args: A11yArgs, global: &GlobalOptions) -> Result<()> {
    let env = utils::environment(global)?;
    let settings = env.a11y();

    let ids = if args.ids.is_empty() {
        settings.components.clone()
    } else {
        args.ids.clone()
    };
    if ids.is_empty() {
        global.warning("No components to check; pass story ids or set a11y.components");
        return Ok(());
    }

    let url = args
        .url
        .clone()
        .or_else(|| settings.server_url.clone())
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
    let runner = args
        .runner
        .clone()
        .or_else(|| settings.runner.clone())
        .unwrap_or_else(|| DEFAULT_RUNNER.to_string());
    let ignore: Vec<String> = settings.ignore.iter().chain(&args.ignore).cloned().collect();

    let mut total = 0;
    let mut failing = 0;
    let mut tool_error = None;
    for id in &ids {
        let story = story_url(&url, id);
        tracing::debug!(%story, %runner, "running pa11y");

        let issues = match run_pa11y(&args.pa11y, &runner, &story).await {
            Ok(issues) => filter_issues(issues, &ignore),
            Err(err) => {
                let summary = err.to_string();
                ui::error(&format!("{id}: {}", summary.lines().next().unwrap_or_default()));
                tool_error.get_or_insert(err);
                continue;
            }
        };
        if issues.is_empty() {
            global.success(&format!("{id}: no issues"));
            continue;
        }

        failing += 1;
        total += issues.len();
        report(id, &issues);
    }

    if total > 0 {
        return Err(CliError::A11yIssues {
            count: total,
            components: failing,
        });
    }
    match tool_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Story iframe URL for a component id.
pub fn story_url(base: &str, id: &str) -> String {
    format!("{}/iframe.html?id={id}", base.trim_end_matches('/'))
}

/// Parse pa11y's `--reporter json` output.
pub fn parse_report(output: &str) -> anyhow::Result<Vec<Issue>> {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(trimmed)?)
}

/// Drop issues whose code or type is ignored. An ignored code also covers
/// every code below it (`WCAG2AA.Principle1` covers `WCAG2AA.Principle1.Guideline1_1`).
pub fn filter_issues(issues: Vec<Issue>, ignore: &[String]) -> Vec<Issue> {
    issues
        .into_iter()
        .filter(|issue| {
            !ignore.iter().any(|ignored| {
                issue.code == *ignored
                    || issue.kind == *ignored
                    || issue
                        .code
                        .strip_prefix(ignored.as_str())
                        .is_some_and(|rest| rest.starts_with('.'))
            })
        })
        .collect()
}

async fn run_pa11y(binary: &str, runner: &str, url: &str) -> Result<Vec<Issue>> {
    let output = Command::new(binary)
        .args(["--reporter", "json", "--runner", runner, url])
        .output()
        .await
        .map_err(|err| CliError::ToolFailed {
            tool: binary.to_string(),
            message: err.to_string(),
        })?;

    // pa11y exits with 2 when it found issues, so the report decides.
    let stdout = String::from_utf8_lossy(&output.stdout);
    match (parse_report(&stdout), output.status.success()) {
        (Ok(issues), true) => Ok(issues),
        (Ok(issues), false) if !issues.is_empty() => Ok(issues),
        (Err(err), true) => Err(CliError::ToolFailed {
            tool: binary.to_string(),
            message: format!("unreadable report for {url}: {err}"),
        }),
        _ => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(CliError::ToolFailed {
                tool: binary.to_string(),
                message: format!("{} for {url}: {}", output.status, stderr.trim()),
            })
        }
    }
}

fn report(id: &str, issues: &[Issue]) {
    let colored = ui::colors_enabled();
    ui::error(&format!("{id}: {} issue(s)", issues.len()));
    for issue in issues {
        if colored {
            eprintln!("  {} {}", issue.kind.red(), issue.code.dimmed());
        } else {
            eprintln!("  {} {}", issue.kind, issue.code);
        }
        eprintln!("    {}", issue.message);
        if !issue.selector.is_empty() {
            eprintln!("    at {}", issue.selector);
        }
    }
}
