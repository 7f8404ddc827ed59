//! Project descriptor (`project.swatch.json`) loading.
//!
//! The descriptor is optional. Loading is best-effort: a missing file, an
//! unreadable file and malformed JSON all behave as "no descriptor".

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// File name of the project descriptor at the project root.
pub const DESCRIPTOR_FILE: &str = "project.swatch.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDescriptor {
    #[serde(default)]
    pub project: ProjectSection,

    #[serde(default)]
    pub variant: VariantSection,

    #[serde(default)]
    pub a11y: A11ySettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSection {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub platform: Option<String>,

    #[serde(default)]
    pub single_directory_components: Option<bool>,

    #[serde(default)]
    pub out_dir: Option<PathBuf>,
}

/// Legacy layout declarations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantSection {
    #[serde(default)]
    pub platform: Option<String>,

    #[serde(default)]
    pub structure_overrides: Option<bool>,

    #[serde(default)]
    pub structure_implementations: Vec<StructureImplementation>,
}

/// A custom component root declared by an older project layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureImplementation {
    pub name: String,
    pub directory: PathBuf,
}

/// Settings for the accessibility lint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct A11ySettings {
    /// Component-library story ids to check
    #[serde(default)]
    pub components: Vec<String>,

    /// Issue codes that never fail the lint
    #[serde(default)]
    pub ignore: Vec<String>,

    #[serde(default)]
    pub server_url: Option<String>,

    /// pa11y runner (`axe` or `htmlcs`)
    #[serde(default)]
    pub runner: Option<String>,
}

impl ProjectDescriptor {
    /// Path of the descriptor inside `project_dir`.
    pub fn path_in(project_dir: &Path) -> PathBuf {
        project_dir.join(DESCRIPTOR_FILE)
    }

    /// Load the descriptor from `project_dir`, treating every failure as absent.
    pub fn load(project_dir: &Path) -> Option<Self> {
        let path = Self::path_in(project_dir);
        if !path.is_file() {
            tracing::debug!("no project descriptor at {}", path.display());
            return None;
        }

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("ignoring unreadable {}: {}", path.display(), err);
                return None;
            }
        };

        match Self::parse(&content) {
            Ok(descriptor) => Some(descriptor),
            Err(err) => {
                tracing::warn!("ignoring malformed {}: {}", path.display(), err);
                None
            }
        }
    }

    pub fn parse(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// Platform declared by the descriptor (`project` wins over `variant`).
    pub fn platform(&self) -> Option<&str> {
        self.project
            .platform
            .as_deref()
            .or(self.variant.platform.as_deref())
    }

    /// Whether the legacy structure-override layout is declared.
    pub fn structure_overrides(&self) -> Option<bool> {
        match self.variant.structure_overrides {
            Some(flag) => Some(flag),
            None if !self.variant.structure_implementations.is_empty() => Some(true),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_returns_none_without_file() {
        let dir = TempDir::new().unwrap();
        assert!(ProjectDescriptor::load(dir.path()).is_none());
    }

    #[test]
    fn load_treats_malformed_json_as_absent() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(DESCRIPTOR_FILE), "{ not json").unwrap();
        assert!(ProjectDescriptor::load(dir.path()).is_none());
    }

    #[test]
    fn load_treats_wrong_field_types_as_absent() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(DESCRIPTOR_FILE),
            r#"{ "project": { "singleDirectoryComponents": "yes please" } }"#,
        )
        .unwrap();
        assert!(ProjectDescriptor::load(dir.path()).is_none());
    }

    #[test]
    fn parses_all_sections() {
        let descriptor = ProjectDescriptor::parse(
            r#"{
                "project": { "name": "kit", "platform": "drupal", "singleDirectoryComponents": true },
                "variant": {
                    "structureImplementations": [
                        { "name": "atoms", "directory": "src/atoms" }
                    ]
                },
                "a11y": { "components": ["components-card--default"], "ignore": ["color-contrast"] }
            }"#,
        )
        .unwrap();

        assert_eq!(descriptor.platform(), Some("drupal"));
        assert_eq!(descriptor.project.single_directory_components, Some(true));
        assert_eq!(descriptor.structure_overrides(), Some(true));
        assert_eq!(
            descriptor.variant.structure_implementations[0].directory,
            PathBuf::from("src/atoms")
        );
        assert_eq!(descriptor.a11y.ignore, vec!["color-contrast".to_string()]);
    }

    #[test]
    fn variant_platform_is_a_fallback() {
        let descriptor =
            ProjectDescriptor::parse(r#"{ "variant": { "platform": "wordpress" } }"#).unwrap();
        assert_eq!(descriptor.platform(), Some("wordpress"));
    }

    #[test]
    fn explicit_structure_flag_wins_over_implementations() {
        let descriptor = ProjectDescriptor::parse(
            r#"{ "variant": { "structureOverrides": false,
                 "structureImplementations": [{ "name": "a", "directory": "a" }] } }"#,
        )
        .unwrap();
        assert_eq!(descriptor.structure_overrides(), Some(false));
    }
}
