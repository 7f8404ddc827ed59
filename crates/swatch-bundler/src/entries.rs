//! Entry-map construction.
//!
//! Every discovered script and stylesheet gets a deterministic output key that
//! encodes its destination path without extension:
//!
//! | namespace     | bucketed layout                  | single-directory layout             |
//! |---------------|----------------------------------|-------------------------------------|
//! | `components/` | `components/card/css/card`       | `components/card/card__style`       |
//! | `global/`     | `global/foundation/js/base`      | `global/foundation/base`            |
//! | `storybook/`  | `storybook/util/preview`         | `storybook/util/preview`            |
//!
//! The legacy structure-override layout ignores namespaces and emits flat
//! `css/<path>` and `js/<path>` keys instead.
//!
//! Keys are unique: the first file routed to a key keeps it and later ones are
//! recorded in [`EntryMap::dropped`].

use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use swatch_config::Environment;

use crate::discovery::DiscoveredFiles;
use crate::patterns::{to_slash, LIBRARY_PREFIX};

/// Appended to stylesheet keys in single-directory mode so they never collide
/// with the script of the same name. Removed again by [`crate::naming`].
pub const STYLE_SUFFIX: &str = "__style";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Style,
    Script,
}

impl AssetKind {
    /// Bucket folder used by the bucketed layout.
    pub fn bucket(self) -> &'static str {
        match self {
            AssetKind::Style => "css",
            AssetKind::Script => "js",
        }
    }

    /// Extension of the compiled output.
    pub fn extension(self) -> &'static str {
        self.bucket()
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "scss" | "css" => Some(AssetKind::Style),
            "js" => Some(AssetKind::Script),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    Global,
    Components,
    Storybook,
}

impl Namespace {
    pub fn as_str(self) -> &'static str {
        match self {
            Namespace::Global => "global",
            Namespace::Components => "components",
            Namespace::Storybook => "storybook",
        }
    }
}

/// Namespace and forward-slash relative path (extension kept) of a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub namespace: Namespace,
    pub relative: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub source: PathBuf,
    pub kind: AssetKind,
    pub namespace: Namespace,
}

/// A key that lost to an earlier file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedEntry {
    pub key: String,
    pub source: PathBuf,
    pub kept: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntryMap {
    pub entries: IndexMap<String, Entry>,
    /// Keys whose output is mirrored back into the project `components/` directory
    pub mirrored: IndexSet<String>,
    pub dropped: Vec<DroppedEntry>,
}

impl EntryMap {
    /// Insert unless the key is taken. Returns whether the entry was kept.
    pub fn insert(&mut self, key: String, entry: Entry) -> bool {
        if let Some(existing) = self.entries.get(&key) {
            tracing::debug!(
                "'{}' already routed from {}, dropping {}",
                key,
                existing.source.display(),
                entry.source.display()
            );
            self.dropped.push(DroppedEntry {
                key,
                kept: existing.source.clone(),
                source: entry.source,
            });
            return false;
        }

        self.entries.insert(key, entry);
        true
    }

    /// Output key -> absolute source path, in insertion order.
    pub fn inputs(&self) -> IndexMap<String, PathBuf> {
        self.entries
            .iter()
            .map(|(key, entry)| (key.clone(), entry.source.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }
}

/// Computes routes and keys for one environment.
pub struct EntryRouter<'a> {
    env: &'a Environment,
    component_roots: Vec<PathBuf>,
}

impl<'a> EntryRouter<'a> {
    pub fn new(env: &'a Environment) -> Self {
        let mut component_roots = env.component_roots();
        // Nested roots must win over their parents.
        component_roots.sort_by_key(|root| std::cmp::Reverse(root.components().count()));
        Self {
            env,
            component_roots,
        }
    }

    pub fn route(&self, path: &Path, library: bool) -> Route {
        if library {
            return Route {
                namespace: Namespace::Storybook,
                relative: self.source_relative(path),
            };
        }

        for root in &self.component_roots {
            if let Ok(relative) = path.strip_prefix(root) {
                return Route {
                    namespace: Namespace::Components,
                    relative: to_slash(relative),
                };
            }
        }

        Route {
            namespace: Namespace::Global,
            relative: self.source_relative(path),
        }
    }

    /// Output key for `path`. A pure function of the path, kind and environment.
    ///
    /// Only single-directory stylesheet keys carry [`STYLE_SUFFIX`] as routing
    /// marker. Any other stylesheet key that happens to end in it gets a second
    /// one, so stripping the marker when naming outputs never merges two keys.
    pub fn key_for(&self, path: &Path, kind: AssetKind, library: bool) -> String {
        let key = sanitize_key(&self.raw_key(path, kind, library));
        let marked = kind == AssetKind::Style
            && !self.env.flags.structure_overrides
            && !library
            && self.env.flags.single_directory_components;

        if kind == AssetKind::Style && !marked && key.ends_with(STYLE_SUFFIX) {
            format!("{key}{STYLE_SUFFIX}")
        } else {
            key
        }
    }

    fn raw_key(&self, path: &Path, kind: AssetKind, library: bool) -> String {
        if self.env.flags.structure_overrides {
            let relative = self.source_relative(path);
            return format!("{}/{}", kind.bucket(), strip_extension(&relative));
        }

        let route = self.route(path, library);
        let stem = strip_extension(&route.relative);
        let (dir, name) = match stem.rsplit_once('/') {
            Some((dir, name)) => (dir, name),
            None => ("", stem),
        };

        match route.namespace {
            Namespace::Storybook => {
                let name = name.strip_prefix(LIBRARY_PREFIX).unwrap_or(name);
                join_segments(&["storybook", dir, name])
            }
            namespace if self.env.flags.single_directory_components => {
                let name = match kind {
                    AssetKind::Style => format!("{name}{STYLE_SUFFIX}"),
                    AssetKind::Script => name.to_string(),
                };
                join_segments(&[namespace.as_str(), dir, &name])
            }
            namespace => join_segments(&[namespace.as_str(), dir, kind.bucket(), name]),
        }
    }

    /// Path relative to the source root, else the project root, else the file name.
    pub fn source_relative(&self, path: &Path) -> String {
        if let Ok(relative) = path.strip_prefix(&self.env.src_dir) {
            return to_slash(relative);
        }
        if let Ok(relative) = path.strip_prefix(&self.env.project_dir) {
            return to_slash(relative);
        }
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Build the entry map from discovered files.
///
/// Groups are routed in a fixed order (global styles, component styles,
/// library styles, global scripts, component scripts); each group is sorted.
pub fn build_entry_map(env: &Environment, files: &DiscoveredFiles) -> EntryMap {
    let router = EntryRouter::new(env);
    let mirror = env.mirrors_components();
    let mut map = EntryMap::default();

    let groups: [(&[PathBuf], AssetKind, bool); 5] = [
        (files.global_styles.as_slice(), AssetKind::Style, false),
        (files.component_styles.as_slice(), AssetKind::Style, false),
        (files.library_styles.as_slice(), AssetKind::Style, true),
        (files.global_scripts.as_slice(), AssetKind::Script, false),
        (files.component_scripts.as_slice(), AssetKind::Script, false),
    ];

    for (paths, kind, library) in groups {
        for path in paths {
            let key = router.key_for(path, kind, library);
            let namespace = router.route(path, library).namespace;
            let entry = Entry {
                source: path.clone(),
                kind,
                namespace,
            };

            if map.insert(key.clone(), entry) && mirror && namespace == Namespace::Components {
                map.mirrored.insert(key);
            }
        }
    }

    tracing::debug!(
        entries = map.len(),
        dropped = map.dropped.len(),
        mirrored = map.mirrored.len(),
        "built entry map"
    );

    map
}

/// Keep only `[A-Za-z0-9/_-]`, collapse repeated slashes and trim the ends.
pub fn sanitize_key(raw: &str) -> String {
    let filtered: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '-'))
        .collect();

    filtered
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Remove the extension of the last path segment.
fn strip_extension(relative: &str) -> &str {
    let name_start = relative.rfind('/').map_or(0, |index| index + 1);
    match relative[name_start..].rfind('.') {
        Some(dot) if dot > 0 => &relative[..name_start + dot],
        _ => relative,
    }
}

fn join_segments(segments: &[&str]) -> String {
    segments
        .iter()
        .filter(|segment| !segment.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use swatch_config::{ModeFlags, StructureImplementation};
    use tempfile::TempDir;

    const SDC: ModeFlags = ModeFlags {
        single_directory_components: true,
        structure_overrides: false,
    };

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src/components")).unwrap();
        dir
    }

    #[test]
    fn single_directory_keys_use_style_suffix() {
        let dir = project();
        let env = Environment::new(dir.path()).with_flags(SDC);
        let router = EntryRouter::new(&env);
        let root = dir.path().join("src/components/accordion");

        assert_eq!(
            router.key_for(&root.join("accordion.js"), AssetKind::Script, false),
            "components/accordion/accordion"
        );
        assert_eq!(
            router.key_for(&root.join("accordion.scss"), AssetKind::Style, false),
            "components/accordion/accordion__style"
        );
    }

    #[test]
    fn bucketed_keys_insert_type_folder() {
        let dir = project();
        let env = Environment::new(dir.path());
        let router = EntryRouter::new(&env);

        assert_eq!(
            router.key_for(
                &dir.path().join("src/components/card/card.scss"),
                AssetKind::Style,
                false
            ),
            "components/card/css/card"
        );
        assert_eq!(
            router.key_for(
                &dir.path().join("src/foundation/base.js"),
                AssetKind::Script,
                false
            ),
            "global/foundation/js/base"
        );
    }

    #[test]
    fn top_level_global_file_has_no_directory_segment() {
        let dir = project();
        let env = Environment::new(dir.path()).with_flags(SDC);
        let router = EntryRouter::new(&env);

        assert_eq!(
            router.key_for(&dir.path().join("src/style.scss"), AssetKind::Style, false),
            "global/style__style"
        );
    }

    #[test]
    fn bucketed_style_ending_in_marker_is_escaped() {
        let dir = project();
        let env = Environment::new(dir.path());
        let router = EntryRouter::new(&env);

        assert_eq!(
            router.key_for(
                &dir.path().join("src/components/card/card__style.scss"),
                AssetKind::Style,
                false
            ),
            "components/card/css/card__style__style"
        );
        assert_eq!(
            router.key_for(
                &dir.path().join("src/components/card/card__style.js"),
                AssetKind::Script,
                false
            ),
            "components/card/js/card__style"
        );
    }

    #[test]
    fn library_styles_route_to_storybook_without_prefix() {
        let dir = project();
        let env = Environment::new(dir.path()).with_flags(SDC);
        let router = EntryRouter::new(&env);

        assert_eq!(
            router.key_for(
                &dir.path().join("src/util/sb-preview.scss"),
                AssetKind::Style,
                true
            ),
            "storybook/util/preview"
        );
    }

    #[test]
    fn structure_overrides_emit_flat_keys() {
        let dir = project();
        let env = Environment::new(dir.path()).with_flags(ModeFlags {
            single_directory_components: true,
            structure_overrides: true,
        });
        let router = EntryRouter::new(&env);

        assert_eq!(
            router.key_for(
                &dir.path().join("src/components/card/card.js"),
                AssetKind::Script,
                false
            ),
            "js/components/card/card"
        );
        assert_eq!(
            router.key_for(
                &dir.path().join("src/components/card/card.scss"),
                AssetKind::Style,
                false
            ),
            "css/components/card/card"
        );
    }

    #[test]
    fn structure_implementation_roots_are_component_roots() {
        let dir = project();
        let env = Environment::new(dir.path()).with_structure_implementations(vec![
            StructureImplementation {
                name: "molecules".to_string(),
                directory: PathBuf::from("src/molecules"),
            },
        ]);
        let router = EntryRouter::new(&env);

        let route = router.route(&dir.path().join("src/molecules/card/card.js"), false);
        assert_eq!(route.namespace, Namespace::Components);
        assert_eq!(route.relative, "card/card.js");
    }

    #[test]
    fn files_outside_source_fall_back_to_file_name() {
        let dir = project();
        let env = Environment::new(dir.path());
        let router = EntryRouter::new(&env);

        let route = router.route(Path::new("/elsewhere/theme.js"), false);
        assert_eq!(route.namespace, Namespace::Global);
        assert_eq!(route.relative, "theme.js");
    }

    #[test]
    fn sanitize_strips_unsafe_characters() {
        assert_eq!(sanitize_key("components/../card/ca rd.v2"), "components/card/cardv2");
        assert_eq!(sanitize_key("global//base/"), "global/base");
        assert_eq!(sanitize_key("components/ünï/x"), "components/n/x");
    }

    #[test]
    fn strip_extension_only_touches_file_name() {
        assert_eq!(strip_extension("v1.2/card.js"), "v1.2/card");
        assert_eq!(strip_extension("card"), "card");
        assert_eq!(strip_extension(".hidden"), ".hidden");
        assert_eq!(strip_extension("card.component.yml"), "card.component");
    }

    #[test]
    fn first_writer_wins_and_collision_is_recorded() {
        let dir = project();
        let env = Environment::new(dir.path()).with_flags(SDC);
        let files = DiscoveredFiles {
            component_scripts: vec![
                dir.path().join("src/components/card/card.js"),
                dir.path().join("src/components/card/ca-rd.js"),
            ],
            global_scripts: vec![dir.path().join("src/components.js")],
            ..Default::default()
        };

        // "ca-rd" is distinct, so only an exact collision counts.
        let map = build_entry_map(&env, &files);
        assert_eq!(map.len(), 3);
        assert!(map.dropped.is_empty());

        let mut map = EntryMap::default();
        let first = Entry {
            source: PathBuf::from("a.js"),
            kind: AssetKind::Script,
            namespace: Namespace::Global,
        };
        let second = Entry {
            source: PathBuf::from("b.js"),
            ..first.clone()
        };
        assert!(map.insert("global/a".to_string(), first));
        assert!(!map.insert("global/a".to_string(), second));
        assert_eq!(map.get("global/a").unwrap().source, PathBuf::from("a.js"));
        assert_eq!(map.dropped[0].source, PathBuf::from("b.js"));
    }

    #[test]
    fn component_keys_are_marked_for_mirroring_on_drupal_sdc() {
        let dir = project();
        let env = Environment::new(dir.path())
            .with_platform("drupal")
            .with_flags(SDC);
        let files = DiscoveredFiles {
            component_scripts: vec![dir.path().join("src/components/card/card.js")],
            global_scripts: vec![dir.path().join("src/util/helpers.js")],
            ..Default::default()
        };

        let map = build_entry_map(&env, &files);
        assert!(map.mirrored.contains("components/card/card"));
        assert!(!map.mirrored.contains("global/util/helpers"));
    }
}
