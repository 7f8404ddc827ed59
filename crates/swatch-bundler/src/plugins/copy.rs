//! Copy non-code source files into the output tree.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use swatch_config::{Environment, ProjectExtensions};
use walkdir::WalkDir;

use super::{BuildContext, Plugin, PluginPhase, PluginReport};
use crate::entries::EntryRouter;
use crate::error::{Error, Result};
use crate::patterns::to_slash;

/// Extensions copied verbatim (templates, metadata, images, fonts).
pub const COPY_EXTENSIONS: &[&str] = &[
    "twig", "yml", "yaml", "json", "md", "svg", "png", "jpg", "jpeg", "gif", "webp", "avif",
    "ico", "woff", "woff2", "ttf", "otf", "eot",
];

const SKIPPED_NAMES: [&str; 3] = ["**/*.stories.*", "**/*.test.*", "**/*.spec.*"];

pub struct CopyPlugin {
    extensions: Vec<String>,
    excludes: Vec<String>,
}

impl CopyPlugin {
    pub fn new(project: Option<&ProjectExtensions>) -> Self {
        let mut extensions: Vec<String> = COPY_EXTENSIONS.iter().map(|ext| ext.to_string()).collect();
        let mut excludes: Vec<String> = SKIPPED_NAMES.iter().map(|glob| glob.to_string()).collect();

        if let Some(project) = project {
            for ext in &project.copy_extensions {
                let ext = ext.to_ascii_lowercase();
                if !extensions.contains(&ext) {
                    extensions.push(ext);
                }
            }
            excludes.extend(project.exclude.iter().cloned());
        }

        Self {
            extensions,
            excludes,
        }
    }

    /// Source files the copy step would pick up, sorted.
    pub fn candidates(&self, env: &Environment, icons: &[PathBuf]) -> Vec<PathBuf> {
        let icons: HashSet<&Path> = icons.iter().map(PathBuf::as_path).collect();
        let mut found = Vec::new();

        for root in source_roots(env) {
            let walker = WalkDir::new(&root)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|entry| {
                    entry.depth() == 0
                        || !entry.file_type().is_dir()
                        || !is_skipped_dir(entry.path(), &env.out_dir)
                });

            for entry in walker.filter_map(|entry| entry.ok()) {
                if !entry.file_type().is_file() {
                    continue;
                }
                let path = entry.path();
                if self.accepts(env, path) && !icons.contains(path) {
                    found.push(path.to_path_buf());
                }
            }
        }

        found
    }

    fn accepts(&self, env: &Environment, path: &Path) -> bool {
        let Some(name) = path.file_name().map(|name| name.to_string_lossy()) else {
            return false;
        };
        if name.starts_with('_') {
            return false;
        }

        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        if !self.extensions.contains(&extension) {
            return false;
        }

        let relative = path
            .strip_prefix(&env.project_dir)
            .map(to_slash)
            .unwrap_or_else(|_| name.to_string());
        !self
            .excludes
            .iter()
            .any(|glob| fast_glob::glob_match(glob, &relative))
    }
}

/// Destination of a copied file inside the output directory.
pub fn destination(env: &Environment, router: &EntryRouter<'_>, path: &Path) -> PathBuf {
    if env.flags.structure_overrides {
        return env.out_dir.join(router.source_relative(path));
    }
    let route = router.route(path, false);
    env.out_dir.join(route.namespace.as_str()).join(route.relative)
}

fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(|err| Error::io(parent, err))?;
    }
    fs::copy(from, to).map_err(|err| Error::io(from, err))?;
    Ok(())
}

/// The source directory plus component roots that live outside it.
fn source_roots(env: &Environment) -> Vec<PathBuf> {
    let mut roots = Vec::new();
    if env.src_dir.is_dir() {
        roots.push(env.src_dir.clone());
    }
    for root in env.component_roots() {
        if root.is_dir() && !roots.iter().any(|existing| root.starts_with(existing)) {
            roots.push(root);
        }
    }
    roots
}

fn is_skipped_dir(path: &Path, out_dir: &Path) -> bool {
    let hidden_or_vendor = path.file_name().is_some_and(|name| {
        let name = name.to_string_lossy();
        name == "node_modules" || name.starts_with('.')
    });
    hidden_or_vendor || path.starts_with(out_dir)
}

impl Plugin for CopyPlugin {
    fn name(&self) -> &'static str {
        "copy"
    }

    fn phase(&self) -> PluginPhase {
        PluginPhase::Assets
    }

    fn write_bundle(&self, ctx: &BuildContext<'_>) -> Result<PluginReport> {
        let router = EntryRouter::new(ctx.env);
        let mut report = PluginReport::default();

        for path in self.candidates(ctx.env, &ctx.files.icons) {
            let target = destination(ctx.env, &router, &path);
            match copy_file(&path, &target) {
                Ok(()) => report.written += 1,
                Err(err) => {
                    tracing::warn!("copy failed: {}", err);
                    report.failed += 1;
                }
            }
        }

        tracing::debug!(copied = report.written, failed = report.failed, "copied static files");
        Ok(report)
    }
}
