//! Command-line interface definition.
//!
//! - `swatch config` - write the bundler configuration
//! - `swatch entries` - print the entry map
//! - `swatch build` - write the config and run the post-bundle steps
//! - `swatch render` - render a namespaced template
//! - `swatch a11y` - accessibility lint of component stories
//! - `swatch watch` - re-run the asset steps on change

mod commands;

use std::path::PathBuf;

use clap::Parser;

pub use commands::{A11yArgs, BuildArgs, Command, ConfigArgs, EntriesArgs, RenderArgs, WatchArgs};

/// Swatch - asset routing for design systems
#[derive(Parser, Debug)]
#[command(
    name = "swatch",
    version,
    about = "Asset routing and bundler configuration for design systems",
    long_about = "Swatch maps a component library's scripts, styles, templates and icons onto\n\
                  a deterministic output tree, writes the configuration a host bundler needs,\n\
                  and runs the file steps (copies, spritemap, component mirroring) around it."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Project root (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}
