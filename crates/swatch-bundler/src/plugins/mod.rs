//! Build plugins and the factory that assembles them.
//!
//! Plugins are plain file-system steps around the host bundler. Each one runs
//! in a [`PluginPhase`]; the registry executes them in phase order after the
//! bundle has been written.

mod copy;
mod mirror;
mod registry;
mod spritemap;
mod templates;
mod yaml;

use serde::Serialize;
use swatch_config::{Environment, ProjectExtensions};

use crate::discovery::DiscoveredFiles;
use crate::entries::EntryMap;
use crate::error::Result;

pub use copy::{CopyPlugin, COPY_EXTENSIONS};
pub use mirror::{mirror_components, prune_empty_dirs, MirrorPlugin};
pub use registry::{PluginOutcome, PluginRegistry};
pub use spritemap::{
    build_spritemap, sprite_file, symbol_id, SpritemapPlugin, DEFAULT_ICON_PREFIX, SPRITE_NAME,
};
pub use templates::{TemplateNamespaces, TemplatePlugin};
pub use yaml::{load_data, parse_yaml, YamlPlugin};

/// Plugin execution phases, lower first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginPhase {
    /// Source transforms configured on the host bundler (templates, YAML)
    Transform = 20,

    /// Files written next to the bundle (copies, spritemap)
    Assets = 30,

    /// Rearranging the finished output tree
    PostProcess = 100,
}

/// Everything a plugin may read while the output is written.
pub struct BuildContext<'a> {
    pub env: &'a Environment,
    pub files: &'a DiscoveredFiles,
    pub entries: &'a EntryMap,
}

/// Per-plugin file counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PluginReport {
    pub written: usize,
    pub removed: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl PluginReport {
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

pub trait Plugin: Send + Sync {
    fn name(&self) -> &'static str;

    fn phase(&self) -> PluginPhase {
        PluginPhase::Transform
    }

    /// Runs once the host bundler has written its output.
    fn write_bundle(&self, _ctx: &BuildContext<'_>) -> Result<PluginReport> {
        Ok(PluginReport::default())
    }
}

/// Name and phase of a plugin, as exported in the bundler config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginDescriptor {
    pub name: &'static str,
    pub phase: PluginPhase,
}

/// Assemble the plugin list for `env`.
///
/// The mirror step is only registered when the platform and layout call for it.
pub fn create_plugins(
    env: &Environment,
    extensions: Option<&ProjectExtensions>,
) -> PluginRegistry {
    let mut registry = PluginRegistry::new();

    registry.add(TemplatePlugin::new(TemplateNamespaces::from_env(env, extensions)));
    registry.add(YamlPlugin);
    registry.add(CopyPlugin::new(extensions));
    registry.add(SpritemapPlugin::new(
        extensions
            .and_then(|ext| ext.icon_prefix.clone())
            .unwrap_or_else(|| DEFAULT_ICON_PREFIX.to_string()),
    ));

    if env.mirrors_components() {
        registry.add(MirrorPlugin);
    }

    registry
}
