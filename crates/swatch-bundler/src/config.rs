//! Bundler configuration assembly.
//!
//! [`BuildPlan`] wires the pipeline together: patterns, discovery, the entry
//! map and the plugin list. [`BundlerConfig`] is the serializable view of a plan
//! that the host bundler reads.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;
use swatch_config::{Environment, ModeFlags, Platform, ProjectExtensions};

use crate::discovery::DiscoveredFiles;
use crate::entries::{build_entry_map, DroppedEntry, EntryMap};
use crate::error::{Error, Result};
use crate::naming::{asset_file_template, entry_file_template, output_file_name};
use crate::patterns::PatternSet;
use crate::plugins::{
    create_plugins, sprite_file, BuildContext, PluginDescriptor, PluginOutcome, PluginRegistry,
    TemplateNamespaces,
};

/// File name of the exported config inside the output directory.
pub const CONFIG_FILE: &str = "swatch.bundler.json";

/// Everything needed to configure and finish one build.
pub struct BuildPlan {
    pub env: Environment,
    pub extensions: Option<ProjectExtensions>,
    pub patterns: PatternSet,
    pub files: DiscoveredFiles,
    pub entries: EntryMap,
    pub namespaces: TemplateNamespaces,
    pub plugins: PluginRegistry,
}

impl BuildPlan {
    pub fn new(env: Environment, extensions: Option<ProjectExtensions>) -> Self {
        let patterns = PatternSet::build(&env, extensions.as_ref());
        let files = DiscoveredFiles::collect(&env, &patterns);
        let entries = build_entry_map(&env, &files);
        let namespaces = TemplateNamespaces::from_env(&env, extensions.as_ref());
        let plugins = create_plugins(&env, extensions.as_ref());

        if !entries.dropped.is_empty() {
            tracing::warn!(
                "{} file(s) share an output key with an earlier file and were dropped",
                entries.dropped.len()
            );
        }

        Self {
            env,
            extensions,
            patterns,
            files,
            entries,
            namespaces,
            plugins,
        }
    }

    /// Plan for `env`, reading `swatch.overrides.toml` from the project root.
    ///
    /// A malformed extensions file is an error; a missing one is not.
    pub fn load(env: Environment) -> Result<Self> {
        let extensions = ProjectExtensions::load(&env.project_dir)?;
        Ok(Self::new(env, extensions))
    }

    pub fn without_plugin(mut self, name: &str) -> Self {
        self.plugins = self.plugins.without(name);
        self
    }

    pub fn context(&self) -> BuildContext<'_> {
        BuildContext {
            env: &self.env,
            files: &self.files,
            entries: &self.entries,
        }
    }

    /// Run the post-bundle steps of every registered plugin.
    pub fn run_plugins(&self) -> Vec<PluginOutcome> {
        self.plugins.write_bundle(&self.context())
    }

    pub fn config(&self) -> BundlerConfig {
        let outputs = self
            .entries
            .entries
            .iter()
            .map(|(key, entry)| (key.clone(), output_file_name(key, entry.kind)))
            .collect();

        BundlerConfig {
            root: self.env.project_dir.clone(),
            src_dir: self.env.src_dir.clone(),
            out_dir: self.env.out_dir.clone(),
            platform: self.env.platform.clone(),
            flags: self.env.flags,
            patterns: self.patterns.clone(),
            input: self.entries.inputs(),
            output: OutputOptions {
                entry_file_names: entry_file_template().to_string(),
                asset_file_names: asset_file_template().to_string(),
                files: outputs,
                sprite: (!self.files.icons.is_empty() && self.plugins.contains("spritemap"))
                    .then(sprite_file),
            },
            mirrored: self.entries.mirrored.iter().cloned().collect(),
            mirror_dir: self
                .env
                .mirrors_components()
                .then(|| self.env.mirror_dir()),
            namespaces: self.namespaces.clone(),
            plugins: self.plugins.descriptors(),
            dropped: self.entries.dropped.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputOptions {
    pub entry_file_names: String,
    pub asset_file_names: String,
    /// Entry key -> output file relative to the output directory
    pub files: IndexMap<String, String>,
    /// Icon spritemap written by the asset steps, when the project has icons
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprite: Option<String>,
}

/// Configuration handed to the host bundler.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundlerConfig {
    pub root: PathBuf,
    pub src_dir: PathBuf,
    pub out_dir: PathBuf,
    pub platform: Platform,
    pub flags: ModeFlags,
    pub patterns: PatternSet,
    pub input: IndexMap<String, PathBuf>,
    pub output: OutputOptions,
    pub mirrored: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mirror_dir: Option<PathBuf>,
    pub namespaces: TemplateNamespaces,
    pub plugins: Vec<PluginDescriptor>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dropped: Vec<DroppedEntry>,
}

impl BundlerConfig {
    pub fn assemble(env: &Environment, extensions: Option<&ProjectExtensions>) -> Self {
        BuildPlan::new(env.clone(), extensions.cloned()).config()
    }

    /// Default location: `<out>/swatch.bundler.json`.
    pub fn default_path(env: &Environment) -> PathBuf {
        env.out_dir.join(CONFIG_FILE)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| Error::io(parent, err))?;
        }
        fs::write(path, json + "\n").map_err(|err| Error::io(path, err))?;
        tracing::debug!("wrote bundler config to {}", path.display());
        Ok(())
    }
}
