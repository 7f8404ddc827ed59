//! Output file naming for entry keys and emitted assets.

use crate::entries::{AssetKind, STYLE_SUFFIX};

/// Directory non-entry assets (fonts, images referenced from styles) are emitted to.
pub const ASSET_DIR: &str = "assets";

/// Final file path (relative to the output root) of the entry `key`.
///
/// `components/accordion/accordion__style` + [`AssetKind::Style`] becomes
/// `components/accordion/accordion.css`. Script keys keep their name.
pub fn output_file_name(key: &str, kind: AssetKind) -> String {
    let stem = match kind {
        AssetKind::Style => key.strip_suffix(STYLE_SUFFIX).unwrap_or(key),
        AssetKind::Script => key,
    };
    format!("{stem}.{}", kind.extension())
}

/// Output path of an auxiliary asset emitted by the bundler.
pub fn asset_file_name(name: &str) -> String {
    let name = name.rsplit(['/', '\\']).next().unwrap_or(name);
    format!("{ASSET_DIR}/{name}")
}

/// Placeholder templates for bundlers that name outputs themselves.
pub fn entry_file_template() -> &'static str {
    "[name].js"
}

pub fn asset_file_template() -> &'static str {
    "assets/[name][extname]"
}
