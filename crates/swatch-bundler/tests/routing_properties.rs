//! Property-based tests for entry routing and spritemap ids.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use proptest::prelude::*;
use swatch_bundler::plugins::build_spritemap;
use swatch_bundler::{build_entry_map, output_file_name, AssetKind, DiscoveredFiles, EntryRouter};
use swatch_config::{Environment, ModeFlags, SourceLayout};

const PROJECT: &str = "/project";

/// Environment with a `src/` layout, without touching the file system.
fn env(flags: ModeFlags) -> Environment {
    let mut env = Environment::new(PROJECT).with_flags(flags);
    env.src_dir = PathBuf::from(PROJECT).join("src");
    env.src_exists = true;
    env.layout = SourceLayout::Src;
    env
}

fn flags_strategy() -> impl Strategy<Value = ModeFlags> {
    (any::<bool>(), any::<bool>()).prop_map(|(sdc, overrides)| ModeFlags {
        single_directory_components: sdc,
        structure_overrides: overrides,
    })
}

/// Relative directory below `src/`, sometimes inside `components/`.
fn dir_strategy() -> impl Strategy<Value = String> {
    (
        any::<bool>(),
        prop::collection::vec("[a-zA-Z0-9_-][a-zA-Z0-9 ._@-]{0,7}", 0..=3),
    )
        .prop_map(|(component, parts)| {
            let mut segments = Vec::new();
            if component {
                segments.push("components".to_string());
            }
            segments.extend(parts);
            segments.join("/")
        })
}

fn stem_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_-][a-zA-Z0-9 ._-]{0,9}"
}

fn source(dir: &str, stem: &str, extension: &str) -> PathBuf {
    let mut path = PathBuf::from(PROJECT).join("src");
    if !dir.is_empty() {
        path.push(dir);
    }
    path.push(format!("{stem}.{extension}"));
    path
}

fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '-')
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Same path, kind and environment always give the same key.
    #[test]
    fn prop_key_is_pure(
        flags in flags_strategy(),
        dir in dir_strategy(),
        stem in stem_strategy(),
        library in any::<bool>(),
    ) {
        let env = env(flags);
        let path = source(&dir, &stem, "scss");

        let first = EntryRouter::new(&env).key_for(&path, AssetKind::Style, library);
        let second = EntryRouter::new(&env.clone()).key_for(&path, AssetKind::Style, library);
        prop_assert_eq!(first, second);
    }

    /// Keys only ever contain `[A-Za-z0-9/_-]`.
    #[test]
    fn prop_keys_use_safe_charset(
        flags in flags_strategy(),
        dir in dir_strategy(),
        stem in stem_strategy(),
        library in any::<bool>(),
    ) {
        let env = env(flags);
        let router = EntryRouter::new(&env);

        for (extension, kind) in [("js", AssetKind::Script), ("scss", AssetKind::Style)] {
            let key = router.key_for(&source(&dir, &stem, extension), kind, library);
            prop_assert!(key.chars().all(is_key_char), "unsafe key {:?}", key);
            prop_assert!(!key.starts_with('/') && !key.ends_with('/'));
            prop_assert!(!key.contains("//"));
        }
    }

    /// In single-directory mode a stylesheet never shares a key with the
    /// script of the same stem.
    #[test]
    fn prop_sdc_style_and_script_never_collide(
        dir in dir_strategy(),
        stem in stem_strategy(),
    ) {
        let env = env(ModeFlags {
            single_directory_components: true,
            structure_overrides: false,
        });
        let router = EntryRouter::new(&env);

        let style = router.key_for(&source(&dir, &stem, "scss"), AssetKind::Style, false);
        let script = router.key_for(&source(&dir, &stem, "js"), AssetKind::Script, false);
        prop_assert_ne!(style, script);
    }

    /// The set of keys does not depend on the order files were discovered in.
    #[test]
    fn prop_key_set_is_order_independent(
        flags in flags_strategy(),
        (files, shuffled) in prop::collection::vec((dir_strategy(), stem_strategy()), 1..=12)
            .prop_flat_map(|files| {
                let shuffled = Just(files.clone()).prop_shuffle();
                (Just(files), shuffled)
            }),
    ) {
        let env = env(flags);
        let discovered = |files: &[(String, String)]| DiscoveredFiles {
            component_scripts: files
                .iter()
                .map(|(dir, stem)| source(dir, stem, "js"))
                .collect(),
            component_styles: files
                .iter()
                .map(|(dir, stem)| source(dir, stem, "scss"))
                .collect(),
            ..Default::default()
        };

        let original: HashSet<String> = build_entry_map(&env, &discovered(&files))
            .entries
            .into_keys()
            .collect();
        let reordered: HashSet<String> = build_entry_map(&env, &discovered(&shuffled))
            .entries
            .into_keys()
            .collect();
        prop_assert_eq!(original, reordered);
    }

    /// No two entries are emitted to the same output file, even when stems
    /// already end in the stylesheet marker.
    #[test]
    fn prop_output_files_are_unique(
        flags in flags_strategy(),
        files in prop::collection::vec(
            (dir_strategy(), stem_strategy(), any::<bool>()),
            1..=12,
        ),
    ) {
        let env = env(flags);
        let stems: Vec<(String, String)> = files
            .into_iter()
            .map(|(dir, stem, marked)| {
                let stem = if marked { format!("{stem}__style") } else { stem };
                (dir, stem)
            })
            .collect();
        let discovered = DiscoveredFiles {
            component_scripts: stems.iter().map(|(dir, stem)| source(dir, stem, "js")).collect(),
            component_styles: stems.iter().map(|(dir, stem)| source(dir, stem, "scss")).collect(),
            ..Default::default()
        };

        let map = build_entry_map(&env, &discovered);
        let outputs: HashSet<String> = map
            .entries
            .iter()
            .map(|(key, entry)| output_file_name(key, entry.kind))
            .collect();
        prop_assert_eq!(outputs.len(), map.len());
    }

    /// Spritemap ids are unique, one per icon, even when stems repeat.
    #[test]
    fn prop_spritemap_ids_are_unique(
        stems in prop::collection::vec("[a-zA-Z -]{0,6}(-[0-9])?", 1..=20),
    ) {
        let icons: Vec<(PathBuf, String)> = stems
            .iter()
            .enumerate()
            .map(|(index, stem)| {
                (
                    Path::new("icons").join(index.to_string()).join(format!("{stem}.svg")),
                    "<svg viewBox=\"0 0 1 1\"><g/></svg>".to_string(),
                )
            })
            .collect();

        let (_, ids) = build_spritemap(&icons, "icon-");
        let unique: HashSet<&String> = ids.iter().collect();
        prop_assert_eq!(ids.len(), icons.len());
        prop_assert_eq!(unique.len(), ids.len());
        prop_assert!(ids.iter().all(|id| id.starts_with("icon-")));
    }
}

#[test]
fn accordion_example_routes_and_names() {
    let env = env(ModeFlags {
        single_directory_components: true,
        structure_overrides: false,
    });
    let files = DiscoveredFiles {
        component_styles: vec![source("components/accordion", "accordion", "scss")],
        component_scripts: vec![source("components/accordion", "accordion", "js")],
        ..Default::default()
    };

    let map = build_entry_map(&env, &files);
    let names: Vec<String> = map
        .entries
        .iter()
        .map(|(key, entry)| swatch_bundler::output_file_name(key, entry.kind))
        .collect();

    assert!(map.get("components/accordion/accordion").is_some());
    assert!(map.get("components/accordion/accordion__style").is_some());
    assert_eq!(
        names,
        vec![
            "components/accordion/accordion.css",
            "components/accordion/accordion.js",
        ]
    );
}
