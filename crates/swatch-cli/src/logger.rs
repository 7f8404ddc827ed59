//! Logging setup for the swatch CLI.
//!
//! Verbosity is picked in this order:
//!
//! 1. `--verbose`: debug for the swatch crates
//! 2. `--quiet`: errors only
//! 3. `RUST_LOG`
//! 4. info for the swatch crates
//!
//! ```rust,no_run
//! use swatch_cli::logger::init_logger;
//!
//! init_logger(false, false, false);
//! tracing::info!("resolving environment");
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "swatch_cli=debug,swatch_bundler=debug,swatch_config=debug";
const QUIET_FILTER: &str = "error";
const DEFAULT_FILTER: &str = "swatch_cli=info,swatch_bundler=info,swatch_config=info";

/// Filter for the given flags. `verbose` wins over `quiet`.
pub fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Install the global subscriber. Call once, before anything logs.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    init_logger_with_filter(filter_for(verbose, quiet), no_color);
}

pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color && should_use_colors())
        .compact();

    // A second call (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

/// `NO_COLOR` disables colors, `FORCE_COLOR` forces them, otherwise the
/// terminal decides.
pub fn should_use_colors() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::Term::stderr().features().colors_supported()
}
