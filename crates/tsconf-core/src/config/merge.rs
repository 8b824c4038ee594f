//! Configuration merging logic
//!
//! Combines an `extends` ancestor with the config that extends it, and rebases
//! the ancestor's `baseUrl` so it stays valid from the descendant's location.

use super::document::{COMPILER_OPTIONS_KEY, TsConfig};
use crate::fs::{dirname_posix, join_posix};
use serde_json::{Map, Value};

/// Merge a config over its ancestor (current takes precedence)
///
/// - Top-level keys: shallow merge, descendant keys win
/// - `compilerOptions`: its own shallow merge, descendant options win
/// - The result always carries a `compilerOptions` object
pub fn merge_extended(base: TsConfig, config: TsConfig) -> TsConfig {
    let mut compiler_options = object_or_empty(base.get(COMPILER_OPTIONS_KEY));
    for (key, value) in object_or_empty(config.get(COMPILER_OPTIONS_KEY)) {
        compiler_options.insert(key, value);
    }

    let mut merged = base.into_map();
    for (key, value) in config.into_map() {
        merged.insert(key, value);
    }
    merged.insert(
        COMPILER_OPTIONS_KEY.to_string(),
        Value::Object(compiler_options),
    );

    TsConfig::from_map(merged)
}

/// Rewrite an ancestor's `compilerOptions.baseUrl` relative to the descendant
///
/// `reference` is the descendant's (normalized) `extends` string; its directory
/// part is joined in front of the ancestor's `baseUrl`. Empty or non-string
/// values are left alone.
pub fn rebase_base_url(base: &mut TsConfig, reference: &str) {
    let Some(base_url) = base.base_url().filter(|url| !url.is_empty()) else {
        return;
    };

    let rebased = join_posix(dirname_posix(reference), base_url);
    tracing::debug!(
        "Rebased inherited baseUrl '{}' to '{}' via '{}'",
        base_url,
        rebased,
        reference
    );
    base.set_compiler_option("baseUrl", Value::String(rebased));
}

fn object_or_empty(value: Option<&Value>) -> Map<String, Value> {
    match value {
        Some(Value::Object(object)) => object.clone(),
        _ => Map::new(),
    }
}
