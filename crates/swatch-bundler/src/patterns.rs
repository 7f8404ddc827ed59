//! Glob pattern construction.
//!
//! Every pattern is relative to the project root and uses forward slashes, so
//! the same [`PatternSet`] matches identically on every platform.

use std::path::Path;

use serde::Serialize;
use swatch_config::{Environment, ProjectExtensions};

/// Stylesheet extensions compiled by the host bundler.
pub const STYLE_GLOB: &str = "*.{scss,css}";
/// Script extensions compiled by the host bundler.
pub const SCRIPT_GLOB: &str = "*.js";
/// File-name prefix marking a stylesheet as component-library only.
pub const LIBRARY_PREFIX: &str = "sb-";

/// Naming conventions that never become bundler entries.
const CONVENTION_EXCLUDES: [&str; 5] = [
    "**/*.stories.*",
    "**/*.test.*",
    "**/*.spec.*",
    "**/*.min.*",
    "**/node_modules/**",
];

/// Include and exclude globs for one asset category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PatternGroup {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl PatternGroup {
    pub fn is_empty(&self) -> bool {
        self.include.is_empty()
    }

    /// Test a project-relative, forward-slash path against the group.
    pub fn matches(&self, relative: &str) -> bool {
        self.include
            .iter()
            .any(|glob| fast_glob::glob_match(glob, relative))
            && !self
                .exclude
                .iter()
                .any(|glob| fast_glob::glob_match(glob, relative))
    }

    fn exclude_conventions(mut self, extra: &[String]) -> Self {
        self.exclude
            .extend(CONVENTION_EXCLUDES.iter().map(|glob| glob.to_string()));
        self.exclude.extend(extra.iter().cloned());
        self
    }
}

/// The fixed set of patterns a build uses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternSet {
    pub global_styles: PatternGroup,
    pub component_styles: PatternGroup,
    pub library_styles: PatternGroup,
    pub global_scripts: PatternGroup,
    pub component_scripts: PatternGroup,
    pub icons: PatternGroup,
}

impl PatternSet {
    pub fn build(env: &Environment, extensions: Option<&ProjectExtensions>) -> Self {
        let extra_excludes: &[String] = extensions
            .map(|ext| ext.exclude.as_slice())
            .unwrap_or_default();

        let roots: Vec<String> = env
            .component_roots()
            .iter()
            .filter(|root| root.is_dir())
            .filter_map(|root| relative_glob_base(&env.project_dir, root))
            .collect();
        let root_excludes: Vec<String> = roots.iter().map(|root| format!("{root}/**")).collect();
        let partials = "**/_*".to_string();
        let library = format!("**/{LIBRARY_PREFIX}*");

        let mut set = PatternSet::default();

        if !roots.is_empty() {
            set.component_styles = PatternGroup {
                include: roots.iter().map(|root| format!("{root}/**/{STYLE_GLOB}")).collect(),
                exclude: vec![partials.clone(), library.clone()],
            };
            set.component_scripts = PatternGroup {
                include: roots.iter().map(|root| format!("{root}/**/{SCRIPT_GLOB}")).collect(),
                exclude: Vec::new(),
            };
        }

        if env.src_exists {
            if let Some(src) = relative_glob_base(&env.project_dir, &env.src_dir) {
                let mut global_style_excludes = root_excludes.clone();
                global_style_excludes.extend([partials.clone(), library.clone()]);

                set.global_styles = PatternGroup {
                    include: vec![format!("{src}/**/{STYLE_GLOB}")],
                    exclude: global_style_excludes,
                };
                set.library_styles = PatternGroup {
                    include: vec![format!("{src}/**/{LIBRARY_PREFIX}{STYLE_GLOB}")],
                    exclude: vec![partials.clone()],
                };
                set.global_scripts = PatternGroup {
                    include: vec![format!("{src}/**/{SCRIPT_GLOB}")],
                    exclude: root_excludes,
                };
                set.icons = PatternGroup {
                    include: vec![
                        format!("{src}/**/icons/**/*.svg"),
                        "assets/icons/**/*.svg".to_string(),
                    ],
                    exclude: Vec::new(),
                };
            }
        }

        PatternSet {
            global_styles: set.global_styles.exclude_conventions(extra_excludes),
            component_styles: set.component_styles.exclude_conventions(extra_excludes),
            library_styles: set.library_styles.exclude_conventions(extra_excludes),
            global_scripts: set.global_scripts.exclude_conventions(extra_excludes),
            component_scripts: set.component_scripts.exclude_conventions(extra_excludes),
            icons: set.icons.exclude_conventions(extra_excludes),
        }
    }

    /// All groups with their names, in routing order.
    pub fn groups(&self) -> [(&'static str, &PatternGroup); 6] {
        [
            ("global_styles", &self.global_styles),
            ("component_styles", &self.component_styles),
            ("library_styles", &self.library_styles),
            ("global_scripts", &self.global_scripts),
            ("component_scripts", &self.component_scripts),
            ("icons", &self.icons),
        ]
    }
}

/// Project-relative forward-slash form of `dir`, or `None` when it lies outside.
pub(crate) fn relative_glob_base(project_dir: &Path, dir: &Path) -> Option<String> {
    match dir.strip_prefix(project_dir) {
        Ok(relative) => Some(to_slash(relative)),
        Err(_) => {
            tracing::warn!(
                "{} is outside the project root and is not scanned",
                dir.display()
            );
            None
        }
    }
}

pub(crate) fn to_slash(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
