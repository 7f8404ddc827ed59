//! Helpers shared by the commands.

use std::fs;
use std::path::{Path, PathBuf};

use swatch_bundler::BuildPlan;
use swatch_config::Environment;

use super::GlobalOptions;
use crate::error::{CliError, Result, ResultExt};

/// Absolute `path`, joined onto `cwd` when relative.
pub fn resolve_path(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Project root from `--cwd`, else the working directory.
pub fn project_dir(global: &GlobalOptions) -> Result<PathBuf> {
    let current = std::env::current_dir()?;
    let dir = match &global.cwd {
        Some(cwd) => resolve_path(cwd, &current),
        None => current,
    };
    if !dir.is_dir() {
        return Err(CliError::FileNotFound(dir));
    }
    Ok(dir)
}

pub fn environment(global: &GlobalOptions) -> Result<Environment> {
    Ok(Environment::resolve_in(project_dir(global)?))
}

/// Resolve the environment and assemble the build plan.
pub fn load_plan(global: &GlobalOptions) -> Result<BuildPlan> {
    let env = environment(global)?;
    let plan = BuildPlan::load(env).with_hint(format!(
        "Fix or remove {}",
        swatch_config::EXTENSIONS_FILE
    ))?;

    for dropped in &plan.entries.dropped {
        global.warning(&format!(
            "{} maps to '{}', already taken by {}",
            dropped.source.display(),
            dropped.key,
            dropped.kept.display()
        ));
    }
    Ok(plan)
}

/// Remove everything inside `out_dir`, keeping the directory.
///
/// Refuses to clean the project root itself or a directory containing it.
pub fn clean_output_dir(out_dir: &Path, project_dir: &Path) -> Result<()> {
    if project_dir.starts_with(out_dir) {
        return Err(CliError::InvalidArgument(format!(
            "refusing to clean {}: it contains the project",
            out_dir.display()
        )));
    }

    if out_dir.exists() {
        if !out_dir.is_dir() {
            return Err(CliError::InvalidArgument(format!(
                "Output path exists but is not a directory: {}",
                out_dir.display()
            )));
        }
        for entry in fs::read_dir(out_dir)? {
            let path = entry?.path();
            if path.is_dir() {
                fs::remove_dir_all(&path).with_path(&path)?;
            } else {
                fs::remove_file(&path).with_path(&path)?;
            }
        }
    } else {
        fs::create_dir_all(out_dir)?;
    }
    Ok(())
}

pub fn ensure_output_dir(out_dir: &Path) -> Result<()> {
    if !out_dir.exists() {
        fs::create_dir_all(out_dir)?;
    } else if !out_dir.is_dir() {
        return Err(CliError::InvalidArgument(format!(
            "Output path exists but is not a directory: {}",
            out_dir.display()
        )));
    }
    Ok(())
}
