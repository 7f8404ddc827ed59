//! `swatch render`: render a namespaced template to stdout or a file.

use std::fs;
use std::path::Path;

use serde_json::Value;
use swatch_bundler::plugins::load_data;
use swatch_bundler::TemplateNamespaces;
use swatch_config::ProjectExtensions;

use super::{utils, GlobalOptions};
use crate::cli::RenderArgs;
use crate::error::{Result, ResultExt};

pub async fn execute(args: RenderArgs, global: &GlobalOptions) -> Result<()> {
    let env = utils::environment(global)?;
    let extensions = ProjectExtensions::load(&env.project_dir)?;
    let namespaces = TemplateNamespaces::from_env(&env, extensions.as_ref());

    let data = match &args.data {
        Some(path) => read_context(&utils::resolve_path(path, &env.project_dir))?,
        None => Value::Object(Default::default()),
    };

    let known: Vec<String> = namespaces.names().map(|name| format!("@{name}")).collect();
    let html = namespaces
        .render(&args.template, &data)
        .with_hint(format!("Known namespaces: {}", known.join(", ")))?;

    match &args.out {
        Some(out) => {
            let path = utils::resolve_path(out, &env.project_dir);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, &html)?;
            global.success(&format!("Rendered {} to {}", args.template, path.display()));
        }
        None => print!("{html}"),
    }
    Ok(())
}

/// Render context from a `.json` file, otherwise YAML.
fn read_context(path: &Path) -> Result<Value> {
    if !path.is_file() {
        return Err(crate::CliError::FileNotFound(path.to_path_buf()));
    }
    if path.extension().is_some_and(|ext| ext == "json") {
        let content = fs::read_to_string(path).with_path(path)?;
        return Ok(serde_json::from_str(&content)?);
    }
    Ok(load_data(path)?)
}
