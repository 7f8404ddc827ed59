//! Resolve pattern groups to files on disk.
//!
//! Walks only the fixed directory prefix of each include glob and matches the
//! project-relative path of every file. Output is sorted so first-wins routing
//! does not depend on directory enumeration order.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use path_clean::PathClean;
use swatch_config::Environment;
use walkdir::{DirEntry, WalkDir};

use crate::patterns::{to_slash, PatternGroup, PatternSet};

/// Files matched by every group of a [`PatternSet`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveredFiles {
    pub global_styles: Vec<PathBuf>,
    pub component_styles: Vec<PathBuf>,
    pub library_styles: Vec<PathBuf>,
    pub global_scripts: Vec<PathBuf>,
    pub component_scripts: Vec<PathBuf>,
    pub icons: Vec<PathBuf>,
}

impl DiscoveredFiles {
    pub fn collect(env: &Environment, patterns: &PatternSet) -> Self {
        let project_dir = env.project_dir.as_path();
        let files = Self {
            global_styles: discover(project_dir, &patterns.global_styles),
            component_styles: discover(project_dir, &patterns.component_styles),
            library_styles: discover(project_dir, &patterns.library_styles),
            global_scripts: discover(project_dir, &patterns.global_scripts),
            component_scripts: discover(project_dir, &patterns.component_scripts),
            icons: discover(project_dir, &patterns.icons),
        };

        tracing::debug!(
            styles = files.global_styles.len() + files.component_styles.len(),
            library = files.library_styles.len(),
            scripts = files.global_scripts.len() + files.component_scripts.len(),
            icons = files.icons.len(),
            "discovered source files"
        );

        files
    }

    pub fn is_empty(&self) -> bool {
        self.global_styles.is_empty()
            && self.component_styles.is_empty()
            && self.library_styles.is_empty()
            && self.global_scripts.is_empty()
            && self.component_scripts.is_empty()
            && self.icons.is_empty()
    }
}

/// Sorted, de-duplicated files under `project_dir` matched by `group`.
///
/// Walk errors are skipped; an unreadable tree simply contributes no files.
pub fn discover(project_dir: &Path, group: &PatternGroup) -> Vec<PathBuf> {
    let bases: BTreeSet<&str> = group.include.iter().map(|glob| glob_base(glob)).collect();
    let mut found = BTreeSet::new();

    for base in bases {
        let dir = project_dir.join(base).clean();
        if !dir.is_dir() {
            continue;
        }

        let walker = WalkDir::new(&dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !is_skipped_dir(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::debug!("skipping unreadable entry: {}", err);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(project_dir) else {
                continue;
            };
            if group.matches(&to_slash(relative)) {
                found.insert(entry.into_path());
            }
        }
    }

    found.into_iter().collect()
}

/// Leading path segments of `glob` that contain no glob syntax.
pub fn glob_base(glob: &str) -> &str {
    let mut end = 0;
    for (index, segment) in glob.split('/').enumerate() {
        if segment.contains(['*', '?', '[', '{']) {
            break;
        }
        end = if index == 0 {
            segment.len()
        } else {
            end + 1 + segment.len()
        };
    }
    &glob[..end.min(glob.len())]
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name == "node_modules" || name.starts_with('.')
}
