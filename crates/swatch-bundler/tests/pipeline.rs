//! End-to-end runs of the build plan against temporary projects.

use std::fs;
use std::path::Path;

use proptest::prelude::*;
use swatch_bundler::plugins::{mirror_components, sprite_file};
use swatch_bundler::{BuildPlan, BundlerConfig, CONFIG_FILE};
use swatch_config::Environment;
use tempfile::TempDir;
use walkdir::WalkDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn drupal_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "project.swatch.json",
        r#"{ "project": { "platform": "drupal", "singleDirectoryComponents": true } }"#,
    );
    write(dir.path(), "src/components/card/card.js", "export {}");
    write(dir.path(), "src/components/card/card.scss", ".card {}");
    write(dir.path(), "src/components/card/card.twig", "<div></div>");
    write(dir.path(), "src/components/card/card.component.yml", "name: Card");
    write(dir.path(), "src/components/card/_card-media.twig", "<img>");
    write(dir.path(), "src/foundation/base.scss", "body {}");
    write(
        dir.path(),
        "src/icons/arrow.svg",
        r#"<svg viewBox="0 0 24 24"><path d="M0 0"/></svg>"#,
    );
    dir
}

/// Stand in for the host bundler: write one file per configured output.
fn emit_bundle(config: &BundlerConfig) {
    for file in config.output.files.values() {
        write(&config.out_dir, file, "/* compiled */");
    }
}

#[test]
fn drupal_sdc_build_mirrors_components() {
    let dir = drupal_project();
    let env = Environment::resolve_in(dir.path());
    let plan = BuildPlan::load(env).unwrap();
    let config = plan.config();

    config
        .write_to(&BundlerConfig::default_path(&plan.env))
        .unwrap();
    emit_bundle(&config);

    let outcomes = plan.run_plugins();
    let names: Vec<_> = outcomes.iter().map(|outcome| outcome.name).collect();
    assert_eq!(names, vec!["templates", "yaml", "copy", "spritemap", "mirror"]);
    assert!(outcomes.iter().all(|outcome| outcome.result.is_ok()));

    let out = dir.path().join("dist");
    assert!(out.join(CONFIG_FILE).is_file());
    assert!(out.join("global/foundation/base.css").is_file());
    assert!(out.join(sprite_file()).is_file());
    assert!(!out.join("components").exists());

    let mirrored = dir.path().join("components/card");
    for name in ["card.js", "card.css", "card.twig", "card.component.yml"] {
        assert!(mirrored.join(name).is_file(), "missing {name}");
    }
    assert!(!mirrored.join("_card-media.twig").exists());
}

#[test]
fn generic_build_keeps_components_in_output() {
    let dir = drupal_project();
    fs::remove_file(dir.path().join("project.swatch.json")).unwrap();

    let plan = BuildPlan::load(Environment::resolve_in(dir.path())).unwrap();
    emit_bundle(&plan.config());
    plan.run_plugins();

    let out = dir.path().join("dist");
    assert!(out.join("components/card/css/card.css").is_file());
    assert!(out.join("components/card/js/card.js").is_file());
    assert!(out.join("components/card/card.twig").is_file());
    assert!(!dir.path().join("components").exists());
}

#[test]
fn skipping_the_mirror_leaves_output_in_place() {
    let dir = drupal_project();
    let plan = BuildPlan::load(Environment::resolve_in(dir.path()))
        .unwrap()
        .without_plugin("mirror");
    emit_bundle(&plan.config());
    plan.run_plugins();

    assert!(dir.path().join("dist/components/card/card.js").is_file());
    assert!(!dir.path().join("components").exists());
}

fn relative_file() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z]{1,4}", 1..=3).prop_map(|parts| format!("{}.txt", parts.join("/")))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Mirroring moves everything under `<out>/components`, leaves no empty
    /// directories behind and touches nothing else.
    #[test]
    fn prop_mirror_never_touches_outside_components(
        components in prop::collection::btree_set(relative_file(), 0..=8),
        others in prop::collection::btree_set(relative_file(), 0..=5),
        empty_dirs in prop::collection::vec("[a-z]{1,3}(/[a-z]{1,3})?", 0..=3),
    ) {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("dist");
        let destination = dir.path().join("components");
        fs::create_dir_all(&out).unwrap();

        for file in &components {
            write(&out, &format!("components/{file}"), file);
        }
        for file in &others {
            write(&out, &format!("global/{file}"), file);
            write(dir.path(), &format!("src/{file}"), file);
        }
        for empty in &empty_dirs {
            fs::create_dir_all(out.join("components").join(empty)).unwrap();
        }

        let report = mirror_components(&out, &destination).unwrap();

        prop_assert_eq!(report.written, components.len());
        prop_assert!(out.is_dir());
        prop_assert!(!out.join("components").exists());
        for file in &components {
            prop_assert!(destination.join(file).is_file());
        }
        for file in &others {
            prop_assert!(out.join("global").join(file).is_file());
            prop_assert!(dir.path().join("src").join(file).is_file());
        }

        let leftover_empty = WalkDir::new(&out)
            .min_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_dir())
            .any(|entry| fs::read_dir(entry.path()).unwrap().next().is_none());
        prop_assert!(!leftover_empty);
    }
}
