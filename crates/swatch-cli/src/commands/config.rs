//! `swatch config`: write the bundler configuration.

use std::fs;

use swatch_bundler::BundlerConfig;

use super::{utils, GlobalOptions};
use crate::cli::ConfigArgs;
use crate::error::Result;
use crate::ui;

pub async fn execute(args: ConfigArgs, global: &GlobalOptions) -> Result<()> {
    let plan = utils::load_plan(global)?;
    let config = plan.config();

    if args.stdout {
        println!("{}", config.to_json()?);
        return Ok(());
    }

    let path = match &args.out {
        Some(out) => utils::resolve_path(out, &plan.env.project_dir),
        None => BundlerConfig::default_path(&plan.env),
    };
    config.write_to(&path)?;

    let size = fs::metadata(&path).map(|meta| meta.len()).unwrap_or(0);
    global.success(&format!(
        "Wrote {} ({}, {} entries)",
        path.display(),
        ui::format_size(size),
        config.input.len()
    ));
    Ok(())
}
