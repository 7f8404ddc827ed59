//! Move compiled components back into the project's `components/` directory.
//!
//! Hosts with single-directory components (Drupal SDC) discover components next
//! to their templates, so the compiled `components/` namespace is relocated out
//! of the output directory once the bundle is written.

use std::fs;
use std::path::{Path, PathBuf};

use path_clean::PathClean;
use walkdir::WalkDir;

use super::{BuildContext, Plugin, PluginPhase, PluginReport};
use crate::entries::Namespace;
use crate::error::{Error, Result};

pub struct MirrorPlugin;

impl Plugin for MirrorPlugin {
    fn name(&self) -> &'static str {
        "mirror"
    }

    fn phase(&self) -> PluginPhase {
        PluginPhase::PostProcess
    }

    fn write_bundle(&self, ctx: &BuildContext<'_>) -> Result<PluginReport> {
        if !ctx.env.mirrors_components() {
            return Ok(PluginReport::default());
        }

        let destination = ctx.env.mirror_dir().clean();
        let source_root = ctx.env.out_dir.join(Namespace::Components.as_str()).clean();
        let overlaps_sources = ctx
            .env
            .component_roots()
            .iter()
            .any(|root| root.clean() == destination);

        if overlaps_sources || destination.starts_with(&source_root) || source_root.starts_with(&destination) {
            tracing::warn!(
                "not mirroring into {}: it overlaps the component sources or the build output",
                destination.display()
            );
            return Ok(PluginReport {
                skipped: 1,
                ..Default::default()
            });
        }

        let report = mirror_components(&ctx.env.out_dir, &destination)?;
        tracing::debug!(
            moved = report.written,
            pruned = report.removed,
            mirrored_entries = ctx.entries.mirrored.len(),
            "mirrored components into {}",
            destination.display()
        );
        Ok(report)
    }
}

/// Move every file under `<out_dir>/components` to `destination`, then prune
/// the directories left empty.
///
/// A file is only deleted after its copy succeeded. Failures are logged and
/// counted per file.
pub fn mirror_components(out_dir: &Path, destination: &Path) -> Result<PluginReport> {
    let source_root = out_dir.join(Namespace::Components.as_str());
    let mut report = PluginReport::default();
    if !source_root.is_dir() {
        return Ok(report);
    }

    let files: Vec<PathBuf> = WalkDir::new(&source_root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect();

    for file in files {
        let Ok(relative) = file.strip_prefix(&source_root) else {
            continue;
        };
        let target = destination.join(relative);

        match move_file(&file, &target) {
            Ok(()) => {
                report.written += 1;
                report.removed += 1;
            }
            Err(err) => {
                tracing::warn!("mirror failed: {}", err);
                report.failed += 1;
            }
        }
    }

    prune_empty_dirs(&source_root, out_dir);
    Ok(report)
}

fn move_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(|err| Error::io(parent, err))?;
    }
    fs::copy(from, to).map_err(|err| Error::io(from, err))?;
    fs::remove_file(from).map_err(|err| Error::io(from, err))?;
    Ok(())
}

/// Remove empty directories in `subtree`, deepest first, `subtree` included.
///
/// Nothing outside `subtree` is touched and `boundary` itself is never
/// removed. Returns the number of directories removed.
pub fn prune_empty_dirs(subtree: &Path, boundary: &Path) -> usize {
    if !subtree.starts_with(boundary) {
        tracing::warn!(
            "refusing to prune {}: not inside {}",
            subtree.display(),
            boundary.display()
        );
        return 0;
    }

    let mut removed = 0;
    let walker = WalkDir::new(subtree).contents_first(true);
    for entry in walker.into_iter().filter_map(|entry| entry.ok()) {
        let path = entry.path();
        if !entry.file_type().is_dir() || path == boundary || !path.starts_with(subtree) {
            continue;
        }
        let is_empty = fs::read_dir(path)
            .map(|mut entries| entries.next().is_none())
            .unwrap_or(false);
        if is_empty {
            match fs::remove_dir(path) {
                Ok(()) => removed += 1,
                Err(err) => tracing::debug!("cannot remove {}: {}", path.display(), err),
            }
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::DiscoveredFiles;
    use crate::entries::EntryMap;
    use swatch_config::{Environment, ModeFlags};
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, relative).unwrap();
    }

    fn drupal_sdc(dir: &Path) -> Environment {
        Environment::new(dir)
            .with_platform("drupal")
            .with_flags(ModeFlags {
                single_directory_components: true,
                structure_overrides: false,
            })
    }

    fn run(env: &Environment) -> PluginReport {
        let files = DiscoveredFiles::default();
        let entries = EntryMap::default();
        let ctx = BuildContext {
            env,
            files: &files,
            entries: &entries,
        };
        MirrorPlugin.write_bundle(&ctx).unwrap()
    }

    #[test]
    fn moves_components_and_prunes_output() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src/components")).unwrap();
        touch(dir.path(), "dist/components/card/card.js");
        touch(dir.path(), "dist/components/card/card.css");
        touch(dir.path(), "dist/global/base.css");
        fs::create_dir_all(dir.path().join("dist/components/empty/nested")).unwrap();

        let report = run(&drupal_sdc(dir.path()));

        assert_eq!(report.written, 2);
        assert!(dir.path().join("components/card/card.js").is_file());
        assert!(dir.path().join("components/card/card.css").is_file());
        assert!(!dir.path().join("dist/components").exists());
        assert!(dir.path().join("dist/global/base.css").is_file());
    }

    #[test]
    fn refuses_when_destination_is_the_component_source() {
        let dir = TempDir::new().unwrap();
        // No src/, so the component root is <project>/components.
        touch(dir.path(), "components/card/card.js");
        touch(dir.path(), "dist/components/card/card.js");

        let report = run(&drupal_sdc(dir.path()));

        assert_eq!(report.skipped, 1);
        assert!(dir.path().join("dist/components/card/card.js").is_file());
    }

    #[test]
    fn inactive_outside_drupal_sdc() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "dist/components/card/card.js");

        let report = run(&Environment::new(dir.path()));

        assert_eq!(report, PluginReport::default());
        assert!(dir.path().join("dist/components/card/card.js").is_file());
    }

    #[test]
    fn prune_keeps_boundary_and_non_empty_dirs() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("dist");
        fs::create_dir_all(out.join("components/a/b")).unwrap();
        touch(dir.path(), "dist/components/keep/file.txt");

        let removed = prune_empty_dirs(&out.join("components"), &out);

        assert_eq!(removed, 2);
        assert!(out.join("components/keep/file.txt").is_file());
        assert!(out.is_dir());

        fs::remove_file(out.join("components/keep/file.txt")).unwrap();
        prune_empty_dirs(&out.join("components"), &out);
        assert!(!out.join("components").exists());
        assert!(out.is_dir());
    }

    #[test]
    fn prune_refuses_subtrees_outside_boundary() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("elsewhere/empty")).unwrap();

        let removed = prune_empty_dirs(&dir.path().join("elsewhere"), &dir.path().join("dist"));

        assert_eq!(removed, 0);
        assert!(dir.path().join("elsewhere/empty").is_dir());
    }
}
