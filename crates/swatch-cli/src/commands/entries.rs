//! `swatch entries`: print the entry map.

use std::path::Path;

use owo_colors::OwoColorize;
use swatch_bundler::EntryMap;

use super::{utils, GlobalOptions};
use crate::cli::EntriesArgs;
use crate::error::Result;
use crate::ui;

pub async fn execute(args: EntriesArgs, global: &GlobalOptions) -> Result<()> {
    let plan = utils::load_plan(global)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan.entries.inputs())?);
        return Ok(());
    }

    if plan.entries.is_empty() {
        global.warning("No entries found");
        return Ok(());
    }

    for line in render_lines(&plan.entries, &plan.env.project_dir, ui::colors_enabled()) {
        println!("{line}");
    }
    global.info(&format!(
        "{} entries, {} mirrored, {} dropped",
        plan.entries.len(),
        plan.entries.mirrored.len(),
        plan.entries.dropped.len()
    ));
    Ok(())
}

/// `key  source` lines with keys padded to a common width.
fn render_lines(entries: &EntryMap, project_dir: &Path, colored: bool) -> Vec<String> {
    let width = entries.entries.keys().map(String::len).max().unwrap_or(0);

    entries
        .entries
        .iter()
        .map(|(key, entry)| {
            let source = entry
                .source
                .strip_prefix(project_dir)
                .unwrap_or(&entry.source)
                .display()
                .to_string();
            let padded = format!("{key:<width$}");
            let mirrored = entries.mirrored.contains(key);

            match (colored, mirrored) {
                (true, true) => format!(
                    "{}  {}  {}",
                    padded.bold(),
                    source.dimmed(),
                    "(mirrored)".cyan()
                ),
                (true, false) => format!("{}  {}", padded.bold(), source.dimmed()),
                (false, true) => format!("{padded}  {source}  (mirrored)"),
                (false, false) => format!("{padded}  {source}"),
            }
        })
        .collect()
}
