//! `swatch watch`: re-run the asset steps when sources change.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::signal;
use tokio::sync::mpsc;

use super::{build, utils, GlobalOptions};
use crate::cli::WatchArgs;
use crate::error::{CliError, Result};
use crate::ui;

/// Recursive watcher over the source tree that forwards relevant paths.
pub struct SourceWatcher {
    _watcher: RecommendedWatcher,
    root: PathBuf,
}

impl SourceWatcher {
    /// Watch `root`, ignoring `out_dir`, `node_modules` and hidden paths.
    pub fn new(root: PathBuf, out_dir: PathBuf) -> Result<(Self, mpsc::Receiver<PathBuf>)> {
        if !root.exists() {
            return Err(CliError::FileNotFound(root));
        }

        let (tx, rx) = mpsc::channel(100);
        let filter_root = root.clone();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let Ok(event) = res else {
                return;
            };
            if !matches!(
                event.kind,
                EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
            ) {
                return;
            }
            for path in event.paths {
                if should_ignore(&path, &filter_root, &out_dir) {
                    continue;
                }
                // Receiver gone means the loop has stopped.
                let _ = tx.blocking_send(path);
            }
        })?;
        watcher.watch(&root, RecursiveMode::Recursive)?;

        Ok((
            Self {
                _watcher: watcher,
                root,
            },
            rx,
        ))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Paths outside `root`, inside the output directory, under `node_modules` or
/// hidden are not sources.
pub fn should_ignore(path: &Path, root: &Path, out_dir: &Path) -> bool {
    if path.starts_with(out_dir) {
        return true;
    }
    let Ok(relative) = path.strip_prefix(root) else {
        return true;
    };

    relative.components().any(|component| {
        let name = component.as_os_str().to_string_lossy();
        name == "node_modules" || (name.starts_with('.') && name != "." && name != "..")
    })
}

pub async fn execute(args: WatchArgs, global: &GlobalOptions) -> Result<()> {
    let plan = utils::load_plan(global)?;
    let root = if plan.env.src_exists {
        plan.env.src_dir.clone()
    } else {
        plan.env.project_dir.clone()
    };
    let out_dir = plan.env.out_dir.clone();
    utils::ensure_output_dir(&out_dir)?;

    rebuild(global).await?;

    let (watcher, mut changes) = SourceWatcher::new(root, out_dir)?;
    global.info(&format!("Watching {}", watcher.root().display()));
    global.info("Press Ctrl+C to stop");

    let debounce = Duration::from_millis(args.debounce);
    loop {
        tokio::select! {
            Some(path) = changes.recv() => {
                let mut count = 1;
                // Collapse a burst of events into one rebuild.
                while let Ok(Some(_)) = tokio::time::timeout(debounce, changes.recv()).await {
                    count += 1;
                }
                tracing::debug!(path = %path.display(), count, "sources changed");
                global.info(&format!("Changed: {}", path.display()));

                if let Err(err) = rebuild(global).await {
                    ui::error(&format!("Rebuild failed: {err}"));
                }
            }
            _ = signal::ctrl_c() => {
                global.info("Stopping watcher");
                break;
            }
        }
    }

    Ok(())
}

/// Reload the plan and run the asset steps. The mirror stays off while
/// watching since the host bundler has not necessarily rebuilt the output.
async fn rebuild(global: &GlobalOptions) -> Result<()> {
    let plan = utils::load_plan(global)?.without_plugin("mirror");
    let outcomes = build::run_plugins(plan).await?;

    let mut written = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(report) => written += report.written,
            Err(err) => global.warning(&format!("{} failed: {err}", outcome.name)),
        }
    }
    global.success(&format!("Asset steps done ({written} files written)"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ignored(path: &str) -> bool {
        should_ignore(
            Path::new(path),
            Path::new("/project/src"),
            Path::new("/project/dist"),
        )
    }

    #[test]
    fn sources_are_watched() {
        assert!(!ignored("/project/src/components/card/card.scss"));
        assert!(!ignored("/project/src/icons/arrow.svg"));
    }

    #[test]
    fn node_modules_and_hidden_paths_are_ignored() {
        assert!(ignored("/project/src/node_modules/pkg/index.js"));
        assert!(ignored("/project/src/.cache/file"));
        assert!(ignored("/project/src/components/.card.scss.swp"));
    }

    #[test]
    fn output_and_outside_paths_are_ignored() {
        assert!(ignored("/project/dist/global/base.css"));
        assert!(ignored("/project/package.json"));
        assert!(should_ignore(
            Path::new("/project/dist/x.css"),
            Path::new("/project"),
            Path::new("/project/dist"),
        ));
    }

    #[tokio::test]
    async fn missing_root_is_an_error() {
        let err = SourceWatcher::new("/no/such/swatch/root".into(), "/no/such/dist".into())
            .err()
            .unwrap();
        assert!(matches!(err, CliError::FileNotFound(_)));
    }
}
