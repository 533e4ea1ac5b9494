use std::borrow::Cow;

use rust_embed::RustEmbed;

/// Sample reference tables shipped inside the binary.
#[derive(RustEmbed)]
#[folder = "assets"]
struct EmbeddedAssets;

/// Returns the embedded copy of a reference table such as `fuel_consumption.json`.
pub fn reference_table(name: &str) -> Option<String> {
    load_asset(name).and_then(|data| String::from_utf8(data.into_owned()).ok())
}

/// Names of every embedded table, sorted.
pub fn reference_table_names() -> Vec<String> {
    let mut names: Vec<String> = EmbeddedAssets::iter()
        .map(|name| name.into_owned())
        .filter(|name| name.ends_with(".json"))
        .collect();
    names.sort();
    names
}

fn load_asset(path: &str) -> Option<Cow<'static, [u8]>> {
    EmbeddedAssets::get(&canonical_asset_path(path)).map(|file| file.data)
}

fn canonical_asset_path(path: &str) -> String {
    let trimmed = path.trim_start_matches('/');
    trimmed
        .strip_prefix("assets/")
        .unwrap_or(trimmed)
        .to_string()
}
