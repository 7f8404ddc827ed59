use std::path::PathBuf;

use clap::{Args, Subcommand};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Assemble and write the bundler configuration
    ///
    /// Resolves the environment, discovers sources and writes the entry map,
    /// naming templates, template namespaces and plugin list as JSON.
    Config(ConfigArgs),

    /// Print the entry map
    Entries(EntriesArgs),

    /// Write the configuration and run the post-bundle steps
    ///
    /// Run after the host bundler has written its output: copies static files,
    /// builds the icon spritemap and mirrors components when the platform
    /// expects them inside the project.
    Build(BuildArgs),

    /// Render a namespaced template
    ///
    /// Examples:
    ///   swatch render @components/card/card.twig --data src/components/card/card.yml
    Render(RenderArgs),

    /// Run the accessibility lint against component-library stories
    ///
    /// Requires `pa11y` on PATH and a running component library server.
    A11y(A11yArgs),

    /// Watch the source tree and re-run the asset steps on change
    Watch(WatchArgs),
}

#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// Output file (defaults to <out>/swatch.bundler.json)
    #[arg(short, long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Print the configuration instead of writing it
    #[arg(long, conflicts_with = "out")]
    pub stdout: bool,
}

#[derive(Args, Debug, Default)]
pub struct EntriesArgs {
    /// Print as JSON (key -> source path)
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Default)]
pub struct BuildArgs {
    /// Empty the output directory first
    ///
    /// Removes previous results, including compiled bundles. Only use it
    /// before the host bundler runs.
    #[arg(long)]
    pub clean: bool,

    /// Leave compiled components in the output directory
    #[arg(long)]
    pub no_mirror: bool,

    /// Do not write the bundler configuration
    #[arg(long)]
    pub skip_config: bool,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Template name, e.g. `@components/card/card.twig`
    #[arg(value_name = "TEMPLATE")]
    pub template: String,

    /// YAML or JSON file used as render context
    #[arg(short, long, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Write the result to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct A11yArgs {
    /// Story ids to check (defaults to `a11y.components` from the descriptor)
    #[arg(value_name = "ID")]
    pub ids: Vec<String>,

    /// Component library URL
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Issue codes to ignore, in addition to the descriptor's list
    #[arg(long, value_name = "CODE")]
    pub ignore: Vec<String>,

    /// pa11y runner
    #[arg(long, value_name = "RUNNER")]
    pub runner: Option<String>,

    /// Executable used to run the checks
    #[arg(long, value_name = "BIN", default_value = "pa11y", hide = true)]
    pub pa11y: String,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Debounce delay in milliseconds
    #[arg(long, default_value_t = 200, value_name = "MS")]
    pub debounce: u64,
}

impl Default for WatchArgs {
    fn default() -> Self {
        Self { debounce: 200 }
    }
}
