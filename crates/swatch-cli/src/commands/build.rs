//! `swatch build`: write the configuration and run the post-bundle steps.

use std::time::Instant;

use swatch_bundler::{BuildPlan, BundlerConfig, PluginOutcome};

use super::{utils, GlobalOptions};
use crate::cli::BuildArgs;
use crate::error::Result;
use crate::ui::{self, Spinner};

pub async fn execute(args: BuildArgs, global: &GlobalOptions) -> Result<()> {
    let start = Instant::now();

    let mut plan = utils::load_plan(global)?;
    if args.clean {
        utils::clean_output_dir(&plan.env.out_dir, &plan.env.project_dir)?;
    } else {
        utils::ensure_output_dir(&plan.env.out_dir)?;
    }

    if !args.skip_config {
        let path = BundlerConfig::default_path(&plan.env);
        plan.config().write_to(&path)?;
        tracing::debug!(path = %path.display(), "wrote bundler configuration");
    }

    if args.no_mirror {
        plan = plan.without_plugin("mirror");
    }

    let entries = plan.entries.len();
    let spinner = (!global.quiet).then(|| Spinner::new("Running asset steps..."));
    let outcomes = run_plugins(plan).await?;
    let failures = outcomes
        .iter()
        .filter(|outcome| match &outcome.result {
            Ok(report) => !report.is_clean(),
            Err(_) => true,
        })
        .count();

    if let Some(spinner) = spinner {
        if failures == 0 {
            spinner.finish("Asset steps complete");
        } else {
            spinner.fail("Asset steps finished with errors");
        }
    }
    if !global.quiet {
        ui::print_build_summary(entries, &outcomes, start.elapsed());
    }

    for outcome in &outcomes {
        if let Err(err) = &outcome.result {
            global.warning(&format!("{} failed: {err}", outcome.name));
        }
    }
    Ok(())
}

/// Plugins do blocking file I/O; keep them off the async workers.
pub(crate) async fn run_plugins(plan: BuildPlan) -> Result<Vec<PluginOutcome>> {
    let outcomes = tokio::task::spawn_blocking(move || plan.run_plugins())
        .await
        .map_err(anyhow::Error::from)?;
    Ok(outcomes)
}
