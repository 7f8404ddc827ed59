//! Template namespaces.
//!
//! Templates include each other by namespaced name (`@components/card/card.twig`).
//! Rendering belongs to minijinja; this module only maps namespaces to
//! directories and installs a loader that understands them.

use std::fs;
use std::path::{Component, Path, PathBuf};

use indexmap::IndexMap;
use minijinja::ErrorKind;
use serde::Serialize;
use swatch_config::{Environment, ProjectExtensions, SourceLayout};

use super::{Plugin, PluginPhase};
use crate::error::{Error, Result};

/// Namespace of the component roots.
pub const COMPONENTS_NAMESPACE: &str = "components";

/// Namespace name -> directories searched in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TemplateNamespaces {
    map: IndexMap<String, Vec<PathBuf>>,
}

impl TemplateNamespaces {
    /// `components` for every component root, one namespace per top-level
    /// source directory, then extension namespaces.
    pub fn from_env(env: &Environment, extensions: Option<&ProjectExtensions>) -> Self {
        let mut namespaces = Self::default();

        for root in env.component_roots() {
            namespaces.add(COMPONENTS_NAMESPACE, root);
        }

        if env.src_exists && env.layout == SourceLayout::Src {
            for dir in top_level_dirs(&env.src_dir) {
                let Some(name) = dir.file_name().map(|n| namespace_name(&n.to_string_lossy()))
                else {
                    continue;
                };
                if name.is_empty() || name == COMPONENTS_NAMESPACE {
                    continue;
                }
                namespaces.add(&name, dir);
            }
        }

        if let Some(extensions) = extensions {
            for (name, dir) in &extensions.namespaces {
                namespaces.add(name, env.project_dir.join(dir));
            }
        }

        namespaces
    }

    pub fn add(&mut self, name: &str, dir: impl Into<PathBuf>) {
        let dir = dir.into();
        let dirs = self.map.entry(name.to_string()).or_default();
        if !dirs.contains(&dir) {
            dirs.push(dir);
        }
    }

    pub fn get(&self, name: &str) -> Option<&[PathBuf]> {
        self.map.get(name).map(Vec::as_slice)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }

    pub fn as_map(&self) -> &IndexMap<String, Vec<PathBuf>> {
        &self.map
    }

    /// File behind a template name.
    ///
    /// `@ns/path` is looked up in the namespace's directories in order. Plain
    /// names are looked up under every directory of every namespace. Names
    /// that climb out of their directory never resolve.
    pub fn resolve(&self, name: &str) -> Result<Option<PathBuf>> {
        let (dirs, relative): (Vec<&PathBuf>, &str) = match name.strip_prefix('@') {
            Some(rest) => {
                let (namespace, relative) = rest.split_once('/').unwrap_or((rest, ""));
                let dirs = self
                    .map
                    .get(namespace)
                    .ok_or_else(|| Error::UnknownNamespace(namespace.to_string()))?;
                (dirs.iter().collect(), relative)
            }
            None => (self.map.values().flatten().collect(), name),
        };

        let relative = Path::new(relative);
        if relative.as_os_str().is_empty()
            || relative
                .components()
                .any(|component| !matches!(component, Component::Normal(_)))
        {
            return Ok(None);
        }

        Ok(dirs
            .into_iter()
            .map(|dir| dir.join(relative))
            .find(|candidate| candidate.is_file()))
    }

    /// A minijinja environment whose loader resolves namespaced names.
    pub fn environment(&self) -> minijinja::Environment<'static> {
        let namespaces = self.clone();
        let mut env = minijinja::Environment::new();
        env.set_loader(move |name| {
            let path = match namespaces.resolve(name) {
                Ok(Some(path)) => path,
                Ok(None) => return Ok(None),
                Err(err) => {
                    return Err(minijinja::Error::new(ErrorKind::TemplateNotFound, err.to_string()))
                }
            };
            fs::read_to_string(&path).map(Some).map_err(|err| {
                minijinja::Error::new(
                    ErrorKind::InvalidOperation,
                    format!("could not read template {}", path.display()),
                )
                .with_source(err)
            })
        });
        env
    }

    /// Render `name` with `data` as context.
    pub fn render(&self, name: &str, data: &serde_json::Value) -> Result<String> {
        let env = self.environment();
        let template = env.get_template(name)?;
        Ok(template.render(data)?)
    }
}

/// Strip an ordering prefix (`00-base` -> `base`) and lowercase.
fn namespace_name(dir_name: &str) -> String {
    let trimmed = dir_name.trim_start_matches(|c: char| c.is_ascii_digit());
    let trimmed = if trimmed.len() < dir_name.len() {
        trimmed.trim_start_matches(['-', '_'])
    } else {
        trimmed
    };
    trimmed.to_ascii_lowercase()
}

fn top_level_dirs(src_dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(src_dir) else {
        return Vec::new();
    };
    let mut dirs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .filter(|path| {
            path.file_name()
                .is_some_and(|name| !name.to_string_lossy().starts_with('.'))
        })
        .collect();
    dirs.sort();
    dirs
}

pub struct TemplatePlugin {
    namespaces: TemplateNamespaces,
}

impl TemplatePlugin {
    pub fn new(namespaces: TemplateNamespaces) -> Self {
        Self { namespaces }
    }

    pub fn namespaces(&self) -> &TemplateNamespaces {
        &self.namespaces
    }
}

impl Plugin for TemplatePlugin {
    fn name(&self) -> &'static str {
        "templates"
    }

    fn phase(&self) -> PluginPhase {
        PluginPhase::Transform
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn namespaces_follow_source_directories() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src/components")).unwrap();
        fs::create_dir_all(dir.path().join("src/00-base")).unwrap();
        fs::create_dir_all(dir.path().join("src/layout")).unwrap();

        let env = Environment::new(dir.path());
        let namespaces = TemplateNamespaces::from_env(&env, None);
        let names: Vec<_> = namespaces.names().collect();

        assert_eq!(names, vec!["components", "base", "layout"]);
        assert_eq!(
            namespaces.get("base").unwrap(),
            &[dir.path().join("src/00-base")]
        );
    }

    #[test]
    fn extension_namespaces_are_appended() {
        let dir = TempDir::new().unwrap();
        let mut extensions = ProjectExtensions::default();
        extensions
            .namespaces
            .insert("vendor".to_string(), PathBuf::from("third_party/templates"));

        let env = Environment::new(dir.path());
        let namespaces = TemplateNamespaces::from_env(&env, Some(&extensions));

        assert_eq!(
            namespaces.get("vendor").unwrap(),
            &[dir.path().join("third_party/templates")]
        );
    }

    #[test]
    fn namespace_names_drop_ordering_prefix() {
        assert_eq!(namespace_name("00-base"), "base");
        assert_eq!(namespace_name("01_Atoms"), "atoms");
        assert_eq!(namespace_name("layout"), "layout");
        assert_eq!(namespace_name("2024"), "");
    }

    #[test]
    fn resolve_rejects_parent_segments() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/components/card/card.twig", "card");
        write(dir.path(), "secret.twig", "nope");

        let env = Environment::new(dir.path());
        let namespaces = TemplateNamespaces::from_env(&env, None);

        assert!(namespaces
            .resolve("@components/card/card.twig")
            .unwrap()
            .is_some());
        assert!(namespaces
            .resolve("@components/../../secret.twig")
            .unwrap()
            .is_none());
        assert!(matches!(
            namespaces.resolve("@missing/x.twig"),
            Err(Error::UnknownNamespace(name)) if name == "missing"
        ));
    }

    #[test]
    fn render_follows_namespaced_includes() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "src/components/card/card.twig",
            "<div class=\"card\">{% include '@base/title.twig' %}</div>",
        );
        write(dir.path(), "src/base/title.twig", "<h2>{{ title }}</h2>");

        let env = Environment::new(dir.path());
        let namespaces = TemplateNamespaces::from_env(&env, None);
        let html = namespaces
            .render("@components/card/card.twig", &json!({ "title": "Hello" }))
            .unwrap();

        assert_eq!(html, "<div class=\"card\"><h2>Hello</h2></div>");
    }
}
