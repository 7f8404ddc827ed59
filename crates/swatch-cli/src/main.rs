//! Swatch CLI entry point.
//!
//! Parses arguments, installs logging and dispatches to a command.

use clap::Parser;
use miette::Result;
use swatch_cli::{cli, commands, error, logger, ui};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    let global = commands::GlobalOptions {
        cwd: args.cwd,
        quiet: args.quiet,
    };

    let result = match args.command {
        cli::Command::Config(config_args) => commands::config_execute(config_args, &global).await,
        cli::Command::Entries(entries_args) => {
            commands::entries_execute(entries_args, &global).await
        }
        cli::Command::Build(build_args) => commands::build_execute(build_args, &global).await,
        cli::Command::Render(render_args) => commands::render_execute(render_args, &global).await,
        cli::Command::A11y(a11y_args) => commands::a11y_execute(a11y_args, &global).await,
        cli::Command::Watch(watch_args) => commands::watch_execute(watch_args, &global).await,
    };

    result.map_err(error::cli_error_to_miette)
}
