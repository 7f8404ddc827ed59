//! Build environment resolution.
//!
//! Produces the immutable [`Environment`] record every other stage takes as a
//! parameter. Values are layered with figment:
//!
//! `SWATCH_*` environment variables > `project.swatch.json` > defaults
//!
//! Resolution never fails. Unusable values are skipped with a warning.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::descriptor::{ProjectDescriptor, StructureImplementation};

/// Prefix of the environment variables that override descriptor values.
pub const ENV_PREFIX: &str = "SWATCH_";

/// Keys (after the prefix is stripped) read from the environment.
const ENV_KEYS: [&str; 4] = [
    "platform",
    "single_directory_components",
    "structure_overrides",
    "out_dir",
];

pub const DEFAULT_PLATFORM: &str = "generic";
pub const DEFAULT_OUT_DIR: &str = "dist";

/// Target platform of the host project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Platform {
    Generic,
    Drupal,
    Other(String),
}

impl Platform {
    pub fn as_str(&self) -> &str {
        match self {
            Platform::Generic => DEFAULT_PLATFORM,
            Platform::Drupal => "drupal",
            Platform::Other(name) => name,
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Platform::Generic
    }
}

impl From<&str> for Platform {
    fn from(value: &str) -> Self {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "" | DEFAULT_PLATFORM => Platform::Generic,
            "drupal" => Platform::Drupal,
            _ => Platform::Other(normalized),
        }
    }
}

impl From<String> for Platform {
    fn from(value: String) -> Self {
        Platform::from(value.as_str())
    }
}

impl From<Platform> for String {
    fn from(value: Platform) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the source tree lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceLayout {
    /// `<project>/src` with a `components/` folder inside
    Src,
    /// Legacy flat `<project>/components` root
    Components,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeFlags {
    /// Scripts and styles share the component folder (no css/ or js/ buckets)
    pub single_directory_components: bool,

    /// Legacy layout: flat js/ and css/ routing
    pub structure_overrides: bool,
}

/// Fully merged settings extracted from figment.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Settings {
    platform: String,
    single_directory_components: bool,
    structure_overrides: bool,
    out_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            platform: DEFAULT_PLATFORM.to_string(),
            single_directory_components: false,
            structure_overrides: false,
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
        }
    }
}

/// Values one layer actually declares; absent keys leave lower layers alone.
#[derive(Debug, Default, Serialize)]
struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    platform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    single_directory_components: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    structure_overrides: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    out_dir: Option<PathBuf>,
}

impl Overrides {
    /// `SWATCH_*` variables, read as raw strings so `SWATCH_OUT_DIR=2024`
    /// stays a path. A flag that does not parse is skipped on its own.
    fn from_env() -> Self {
        let mut layer = Self::default();
        for (key, value) in Env::prefixed(ENV_PREFIX).only(&ENV_KEYS).iter() {
            let key = key.as_str().to_ascii_lowercase();
            match key.as_str() {
                "platform" => layer.platform = Some(value),
                "out_dir" => layer.out_dir = Some(PathBuf::from(value)),
                "single_directory_components" | "structure_overrides" => {
                    let Some(flag) = parse_flag(&value) else {
                        tracing::warn!(
                            "ignoring {}{}={:?}: expected true or false",
                            ENV_PREFIX,
                            key.to_ascii_uppercase(),
                            value
                        );
                        continue;
                    };
                    if key == "structure_overrides" {
                        layer.structure_overrides = Some(flag);
                    } else {
                        layer.single_directory_components = Some(flag);
                    }
                }
                _ => {}
            }
        }
        layer
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl From<&ProjectDescriptor> for Overrides {
    fn from(descriptor: &ProjectDescriptor) -> Self {
        Self {
            platform: descriptor.platform().map(str::to_string),
            single_directory_components: descriptor.project.single_directory_components,
            structure_overrides: descriptor.structure_overrides(),
            out_dir: descriptor.project.out_dir.clone(),
        }
    }
}

/// The resolved build environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    pub project_dir: PathBuf,
    pub src_dir: PathBuf,
    pub src_exists: bool,
    pub layout: SourceLayout,
    pub out_dir: PathBuf,
    pub platform: Platform,
    pub flags: ModeFlags,
    pub structure_implementations: Vec<StructureImplementation>,
    pub descriptor: Option<ProjectDescriptor>,
}

impl Environment {
    /// Environment with defaults for `project_dir`, ignoring descriptor and env.
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        let project_dir = project_dir.into();
        let (src_dir, layout) = locate_source(&project_dir);

        Self {
            src_exists: src_dir.is_dir(),
            src_dir,
            layout,
            out_dir: project_dir.join(DEFAULT_OUT_DIR),
            project_dir,
            platform: Platform::Generic,
            flags: ModeFlags::default(),
            structure_implementations: Vec::new(),
            descriptor: None,
        }
    }

    /// Resolve from the process working directory.
    pub fn resolve() -> Self {
        let project_dir = std::env::current_dir().unwrap_or_else(|err| {
            tracing::warn!("cannot read working directory ({}), using '.'", err);
            PathBuf::from(".")
        });
        Self::resolve_in(project_dir)
    }

    /// Resolve for an explicit project root.
    pub fn resolve_in(project_dir: impl Into<PathBuf>) -> Self {
        let mut env = Self::new(project_dir);
        let descriptor = ProjectDescriptor::load(&env.project_dir);
        let settings = extract_settings(descriptor.as_ref());

        env.platform = Platform::from(settings.platform);
        env.flags = ModeFlags {
            single_directory_components: settings.single_directory_components,
            structure_overrides: settings.structure_overrides,
        };
        env.out_dir = if settings.out_dir.is_absolute() {
            settings.out_dir
        } else {
            env.project_dir.join(settings.out_dir)
        };
        if let Some(descriptor) = &descriptor {
            env.structure_implementations = descriptor.variant.structure_implementations.clone();
        }
        env.descriptor = descriptor;

        tracing::debug!(
            platform = %env.platform,
            sdc = env.flags.single_directory_components,
            structure_overrides = env.flags.structure_overrides,
            src = %env.src_dir.display(),
            "resolved environment"
        );

        env
    }

    pub fn with_platform(mut self, platform: impl Into<Platform>) -> Self {
        self.platform = platform.into();
        self
    }

    pub fn with_flags(mut self, flags: ModeFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_out_dir(mut self, out_dir: impl AsRef<Path>) -> Self {
        self.out_dir = self.project_dir.join(out_dir);
        self
    }

    pub fn with_structure_implementations(
        mut self,
        implementations: Vec<StructureImplementation>,
    ) -> Self {
        self.structure_implementations = implementations;
        self
    }

    /// Directories whose contents route to the `components/` namespace.
    pub fn component_roots(&self) -> Vec<PathBuf> {
        if !self.structure_implementations.is_empty() {
            return self
                .structure_implementations
                .iter()
                .map(|implementation| self.project_dir.join(&implementation.directory))
                .collect();
        }

        match self.layout {
            SourceLayout::Src => vec![self.src_dir.join("components")],
            SourceLayout::Components => vec![self.src_dir.clone()],
        }
    }

    /// Compiled components are copied back to `<project>/components`.
    pub fn mirrors_components(&self) -> bool {
        self.platform == Platform::Drupal
            && self.flags.single_directory_components
            && !self.flags.structure_overrides
    }

    /// Destination of the mirror step.
    pub fn mirror_dir(&self) -> PathBuf {
        self.project_dir.join("components")
    }

    pub fn a11y(&self) -> crate::A11ySettings {
        self.descriptor
            .as_ref()
            .map(|descriptor| descriptor.a11y.clone())
            .unwrap_or_default()
    }
}

fn locate_source(project_dir: &Path) -> (PathBuf, SourceLayout) {
    let src = project_dir.join("src");
    if src.is_dir() {
        (src, SourceLayout::Src)
    } else {
        (project_dir.join("components"), SourceLayout::Components)
    }
}

fn extract_settings(descriptor: Option<&ProjectDescriptor>) -> Settings {
    let mut figment = Figment::from(Serialized::defaults(Settings::default()));
    if let Some(descriptor) = descriptor {
        figment = figment.merge(Serialized::defaults(Overrides::from(descriptor)));
    }
    figment = figment.merge(Serialized::defaults(Overrides::from_env()));

    figment.extract().unwrap_or_else(|err| {
        tracing::warn!("ignoring project overrides: {}", err);
        Settings::default()
    })
}
