//! Optional project extensions (`swatch.overrides.toml`).
//!
//! A project may extend the defaults with extra template namespaces, copy
//! extensions and exclude globs. The file is optional, but once present it must
//! parse: errors are reported rather than swallowed.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

pub const EXTENSIONS_FILE: &str = "swatch.overrides.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectExtensions {
    /// Extra template namespaces, name -> directory relative to the project root
    #[serde(default)]
    pub namespaces: IndexMap<String, PathBuf>,

    /// Extra file extensions picked up by the copy step (without the dot)
    #[serde(default)]
    pub copy_extensions: Vec<String>,

    /// Extra exclude globs applied to every pattern group
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Spritemap symbol id prefix
    #[serde(default)]
    pub icon_prefix: Option<String>,
}

impl ProjectExtensions {
    /// Load `swatch.overrides.toml` from `project_dir`.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    pub fn load(project_dir: &Path) -> Result<Option<Self>> {
        let path = project_dir.join(EXTENSIONS_FILE);
        if !path.is_file() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)?;
        let extensions = Self::parse(&content).map_err(|err| match err {
            ConfigError::InvalidToml { message, .. } => ConfigError::InvalidToml {
                path: path.clone(),
                message,
            },
            other => other,
        })?;

        tracing::debug!("loaded project extensions from {}", path.display());
        Ok(Some(extensions))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let extensions: Self = toml::from_str(content).map_err(|e| ConfigError::InvalidToml {
            path: PathBuf::from(EXTENSIONS_FILE),
            message: e.to_string(),
        })?;
        extensions.validate()?;
        Ok(extensions)
    }

    fn validate(&self) -> Result<()> {
        for name in self.namespaces.keys() {
            if name.is_empty() || name.contains('/') || name.starts_with('@') {
                return Err(ConfigError::InvalidValue {
                    field: "namespaces".to_string(),
                    message: format!("'{name}' must be a bare name such as 'layouts'"),
                });
            }
        }

        for ext in &self.copy_extensions {
            if ext.is_empty() || ext.starts_with('.') {
                return Err(ConfigError::InvalidValue {
                    field: "copy_extensions".to_string(),
                    message: format!("'{ext}' must be an extension without the leading dot"),
                });
            }
        }

        Ok(())
    }
}
