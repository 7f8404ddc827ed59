//! SVG icon spritemap.
//!
//! Every icon becomes one `<symbol>` inside a single hidden `<svg>`. Symbol ids
//! come from the file stem and stay unique across the whole set.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use super::{BuildContext, Plugin, PluginPhase, PluginReport};
use crate::error::{Error, Result};
use crate::naming::asset_file_name;

/// File name of the spritemap inside the asset directory.
pub const SPRITE_NAME: &str = "icons.sprite.svg";

/// Spritemap path relative to the output directory.
pub fn sprite_file() -> String {
    asset_file_name(SPRITE_NAME)
}
pub const DEFAULT_ICON_PREFIX: &str = "icon-";

static SVG_ELEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<svg\b([^>]*)>(.*)</svg>").expect("valid regex"));
static VIEW_BOX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bviewBox\s*=\s*["']([^"']*)["']"#).expect("valid regex"));
static WIDTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?:^|\s)width\s*=\s*["']([\d.]+)(?:px)?["']"#).expect("valid regex"));
static HEIGHT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?:^|\s)height\s*=\s*["']([\d.]+)(?:px)?["']"#).expect("valid regex"));
static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));

/// Symbol id for `path`: the prefix plus the lowercased stem with every run of
/// other characters collapsed to `-`.
pub fn symbol_id(prefix: &str, path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    let mut slug = String::with_capacity(stem.len());
    for c in stem.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            slug.push(c);
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');

    if slug.is_empty() {
        format!("{prefix}icon")
    } else {
        format!("{prefix}{slug}")
    }
}

/// First free id among `base`, `base-2`, `base-3`, ...
fn unique_id(base: String, taken: &mut HashSet<String>) -> String {
    if taken.insert(base.clone()) {
        return base;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{base}-{n}");
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

fn symbol(id: &str, svg: &str) -> Option<String> {
    let svg = COMMENT.replace_all(svg, "");
    let captures = SVG_ELEMENT.captures(&svg)?;
    let attributes = captures.get(1).map_or("", |m| m.as_str());
    let body = captures.get(2).map_or("", |m| m.as_str()).trim();

    let view_box = VIEW_BOX
        .captures(attributes)
        .map(|c| c[1].to_string())
        .or_else(|| {
            let width = WIDTH.captures(attributes)?;
            let height = HEIGHT.captures(attributes)?;
            Some(format!("0 0 {} {}", &width[1], &height[1]))
        });

    Some(match view_box {
        Some(view_box) => format!("<symbol id=\"{id}\" viewBox=\"{view_box}\">{body}</symbol>"),
        None => format!("<symbol id=\"{id}\">{body}</symbol>"),
    })
}

/// Build the spritemap document from `(path, svg source)` pairs.
///
/// Returns the document and the ids assigned, in input order. Inputs that
/// contain no `<svg>` element are skipped.
pub fn build_spritemap(icons: &[(PathBuf, String)], prefix: &str) -> (String, Vec<String>) {
    let mut taken = HashSet::new();
    let mut ids = Vec::with_capacity(icons.len());
    let mut symbols = Vec::with_capacity(icons.len());

    for (path, source) in icons {
        if !SVG_ELEMENT.is_match(source) {
            tracing::warn!("{} has no <svg> element, skipping", path.display());
            continue;
        }
        let id = unique_id(symbol_id(prefix, path), &mut taken);
        if let Some(symbol) = symbol(&id, source) {
            symbols.push(symbol);
            ids.push(id);
        }
    }

    let mut document = String::from(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" style=\"display:none\">\n",
    );
    for symbol in &symbols {
        document.push_str(symbol);
        document.push('\n');
    }
    document.push_str("</svg>\n");

    (document, ids)
}

pub struct SpritemapPlugin {
    prefix: String,
}

impl SpritemapPlugin {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Plugin for SpritemapPlugin {
    fn name(&self) -> &'static str {
        "spritemap"
    }

    fn phase(&self) -> PluginPhase {
        PluginPhase::Assets
    }

    fn write_bundle(&self, ctx: &BuildContext<'_>) -> Result<PluginReport> {
        let mut report = PluginReport::default();
        if ctx.files.icons.is_empty() {
            return Ok(report);
        }

        let mut icons = Vec::with_capacity(ctx.files.icons.len());
        for path in &ctx.files.icons {
            match fs::read_to_string(path) {
                Ok(source) => icons.push((path.clone(), source)),
                Err(err) => {
                    tracing::warn!("cannot read icon {}: {}", path.display(), err);
                    report.failed += 1;
                }
            }
        }

        let (document, ids) = build_spritemap(&icons, &self.prefix);
        report.skipped = icons.len() - ids.len();

        let target = ctx.env.out_dir.join(sprite_file());
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|err| Error::io(parent, err))?;
        }
        fs::write(&target, document).map_err(|err| Error::io(&target, err))?;
        report.written = 1;

        tracing::debug!(symbols = ids.len(), "wrote {}", target.display());
        Ok(report)
    }
}
