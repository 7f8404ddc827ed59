//! YAML imports.
//!
//! Component data files (`card.yml`) are imported by scripts as plain objects
//! and fed to templates as render context.

use std::fs;
use std::path::Path;

use serde_json::Value as JsonValue;

use super::{BuildContext, CopyPlugin, Plugin, PluginPhase, PluginReport};
use crate::error::{Error, Result};

pub struct YamlPlugin;

impl YamlPlugin {
    pub fn handles(path: &Path) -> bool {
        matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("yml" | "yaml")
        )
    }

    /// Turn a YAML source into an ES module exporting its data.
    ///
    /// Returns `Ok(None)` for files this plugin does not handle.
    pub fn transform(&self, path: &Path, source: &str) -> Result<Option<String>> {
        if !Self::handles(path) {
            return Ok(None);
        }
        let data = parse_yaml(path, source)?;
        let json = serde_json::to_string(&data)?;
        Ok(Some(format!("export default {json};\n")))
    }
}

impl Plugin for YamlPlugin {
    fn name(&self) -> &'static str {
        "yaml"
    }

    fn phase(&self) -> PluginPhase {
        PluginPhase::Transform
    }

    /// Check that every shipped data file still turns into a module. Broken
    /// files are logged and counted; nothing is written.
    fn write_bundle(&self, ctx: &BuildContext<'_>) -> Result<PluginReport> {
        let mut report = PluginReport::default();
        let data_files = CopyPlugin::new(None)
            .candidates(ctx.env, &ctx.files.icons)
            .into_iter()
            .filter(|path| Self::handles(path));

        for path in data_files {
            let checked = fs::read_to_string(&path)
                .map_err(|err| Error::io(&path, err))
                .and_then(|source| self.transform(&path, &source));
            if let Err(err) = checked {
                tracing::warn!("{}", err);
                report.failed += 1;
            }
        }
        Ok(report)
    }
}

/// Parse YAML into a JSON value. An empty document is `null`.
pub fn parse_yaml(path: &Path, source: &str) -> Result<JsonValue> {
    if source.trim().is_empty() {
        return Ok(JsonValue::Null);
    }
    serde_saphyr::from_str(source).map_err(|err| Error::Yaml {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

pub fn load_data(path: &Path) -> Result<JsonValue> {
    let source = fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
    parse_yaml(path, &source)
}
