//! Asset routing for swatch design-system builds.
//!
//! The pipeline is a chain of pure functions over a resolved
//! [`swatch_config::Environment`]:
//!
//! 1. [`PatternSet::build`] derives include/exclude globs per asset category.
//! 2. [`DiscoveredFiles::collect`] resolves them to sorted files on disk.
//! 3. [`build_entry_map`] assigns every script and stylesheet an output key.
//! 4. [`BuildPlan`] adds template namespaces and plugins, and exports a
//!    [`BundlerConfig`] for the host bundler.
//!
//! After the host bundler has written its output, [`BuildPlan::run_plugins`]
//! performs the file steps (static copies, icon spritemap, component mirror).
//!
//! ```no_run
//! use swatch_bundler::{BuildPlan, BundlerConfig};
//! use swatch_config::Environment;
//!
//! let plan = BuildPlan::load(Environment::resolve())?;
//! plan.config().write_to(&BundlerConfig::default_path(&plan.env))?;
//! # Ok::<(), swatch_bundler::Error>(())
//! ```

pub mod config;
pub mod discovery;
pub mod entries;
pub mod error;
pub mod naming;
pub mod patterns;
pub mod plugins;

pub use config::{BuildPlan, BundlerConfig, OutputOptions, CONFIG_FILE};
pub use discovery::{discover, DiscoveredFiles};
pub use entries::{
    build_entry_map, sanitize_key, AssetKind, DroppedEntry, Entry, EntryMap, EntryRouter,
    Namespace, Route, STYLE_SUFFIX,
};
pub use error::{Error, Result};
pub use naming::{asset_file_name, output_file_name};
pub use patterns::{PatternGroup, PatternSet, LIBRARY_PREFIX};
pub use plugins::{
    create_plugins, BuildContext, Plugin, PluginDescriptor, PluginOutcome, PluginPhase,
    PluginRegistry, PluginReport, TemplateNamespaces,
};
