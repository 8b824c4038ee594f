//! The `tsconfig.json` / `jsconfig.json` document model
//!
//! The document is deliberately open: only `extends`, `compilerOptions` and
//! `include` are interpreted, every other key is carried through untouched and
//! in its original order.

use crate::{Result, TsconfError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key of the inheritance reference
pub const EXTENDS_KEY: &str = "extends";
/// Key of the nested compiler option object
pub const COMPILER_OPTIONS_KEY: &str = "compilerOptions";
/// Key of the include glob list
pub const INCLUDE_KEY: &str = "include";

/// A parsed config document (raw or resolved)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TsConfig {
    root: Map<String, Value>,
}

impl TsConfig {
    /// Create an empty document (`{}`)
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from a JSON value, checking the shape of the keys we interpret
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(root) = value else {
            return Err(TsconfError::config_error(format!(
                "expected a JSON object at the top level, found {}",
                json_type_name(&value)
            )));
        };

        if let Some(extends) = root.get(EXTENDS_KEY)
            && !extends.is_string()
        {
            return Err(TsconfError::config_error(format!(
                "'{EXTENDS_KEY}' must be a string, found {}",
                json_type_name(extends)
            )));
        }

        if let Some(options) = root.get(COMPILER_OPTIONS_KEY)
            && !options.is_object()
        {
            return Err(TsconfError::config_error(format!(
                "'{COMPILER_OPTIONS_KEY}' must be an object, found {}",
                json_type_name(options)
            )));
        }

        Ok(Self { root })
    }

    /// Build a document from an already validated object map
    pub(crate) fn from_map(root: Map<String, Value>) -> Self {
        Self { root }
    }

    /// Consume the document, returning its top-level object
    pub fn into_map(self) -> Map<String, Value> {
        self.root
    }

    /// The document as a JSON value
    pub fn to_value(&self) -> Value {
        Value::Object(self.root.clone())
    }

    /// Whether `key` is present at the top level
    pub fn contains_key(&self, key: &str) -> bool {
        self.root.contains_key(key)
    }

    /// Top-level value for `key`
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    /// The `extends` reference, if any
    pub fn extends(&self) -> Option<&str> {
        self.root.get(EXTENDS_KEY).and_then(Value::as_str)
    }

    /// The `compilerOptions` object, if any
    pub fn compiler_options(&self) -> Option<&Map<String, Value>> {
        self.root.get(COMPILER_OPTIONS_KEY).and_then(Value::as_object)
    }

    /// A single compiler option, if set
    pub fn compiler_option(&self, key: &str) -> Option<&Value> {
        self.compiler_options().and_then(|options| options.get(key))
    }

    /// Mutable access to `compilerOptions`, creating an empty object when absent
    pub fn compiler_options_mut(&mut self) -> &mut Map<String, Value> {
        let entry = self
            .root
            .entry(COMPILER_OPTIONS_KEY)
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        match entry {
            Value::Object(options) => options,
            _ => unreachable!("compilerOptions was just set to an object"),
        }
    }

    /// Set a single compiler option
    pub fn set_compiler_option(&mut self, key: impl Into<String>, value: Value) {
        self.compiler_options_mut().insert(key.into(), value);
    }

    /// The `include` glob list, if present and made of strings
    pub fn include(&self) -> Option<Vec<String>> {
        self.root.get(INCLUDE_KEY).and_then(Value::as_array).map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
    }

    /// Replace the `include` list
    pub fn set_include(&mut self, include: &[String]) {
        let items = include.iter().cloned().map(Value::String).collect();
        self.root.insert(INCLUDE_KEY.to_string(), Value::Array(items));
    }

    /// Effective `compilerOptions.baseUrl` when it is a string
    pub fn base_url(&self) -> Option<&str> {
        self.compiler_option("baseUrl").and_then(Value::as_str)
    }

    /// Effective `compilerOptions.paths` mapping
    ///
    /// Entries whose value is not an array are dropped, as are non-string
    /// array items.
    pub fn paths(&self) -> Option<IndexMap<String, Vec<String>>> {
        let paths = self.compiler_option("paths")?.as_object()?;
        Some(
            paths
                .iter()
                .filter_map(|(pattern, targets)| {
                    let targets = targets
                        .as_array()?
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect();
                    Some((pattern.clone(), targets))
                })
                .collect(),
        )
    }

    /// Effective `compilerOptions.strict` when it is a boolean
    pub fn strict(&self) -> Option<bool> {
        self.compiler_option("strict").and_then(Value::as_bool)
    }

    /// Serialize with 2-space indentation, the format written back to disk
    pub fn to_pretty_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.root)
            .map_err(|e| TsconfError::serialize_error(format!("Failed to serialize config: {e}")))
    }
}

impl TryFrom<Value> for TsConfig {
    type Error = TsconfError;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(value)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accessors() {
        let config = TsConfig::from_value(json!({
            "extends": "./base",
            "compilerOptions": {
                "baseUrl": ".",
                "strict": false,
                "paths": { "~/*": ["./app/*"], "broken": "nope" }
            },
            "include": ["**/*.ts", 3]
        }))
        .unwrap();

        assert_eq!(config.extends(), Some("./base"));
        assert_eq!(config.base_url(), Some("."));
        assert_eq!(config.strict(), Some(false));
        let paths = config.paths().unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths["~/*"], vec!["./app/*".to_string()]);
        assert_eq!(config.include(), Some(vec!["**/*.ts".to_string()]));
    }

    #[test]
    fn test_rejects_non_object_document() {
        let err = TsConfig::from_value(json!(["not", "an", "object"])).unwrap_err();
        assert!(err.to_string().contains("expected a JSON object"));
    }

    #[test]
    fn test_rejects_non_string_extends() {
        let err = TsConfig::from_value(json!({ "extends": 42 })).unwrap_err();
        assert!(err.to_string().contains("'extends' must be a string"));
    }

    #[test]
    fn test_rejects_non_object_compiler_options() {
        let err = TsConfig::from_value(json!({ "compilerOptions": true })).unwrap_err();
        assert!(err.to_string().contains("'compilerOptions' must be an object"));
    }

    #[test]
    fn test_set_compiler_option_creates_object() {
        let mut config = TsConfig::new();
        config.set_compiler_option("strict", json!(true));
        assert_eq!(config.to_value(), json!({ "compilerOptions": { "strict": true } }));
    }

    #[test]
    fn test_unknown_keys_keep_their_order() {
        let config = TsConfig::from_value(json!({
            "zeta": 1,
            "alpha": 2,
            "compilerOptions": {}
        }))
        .unwrap();

        let keys: Vec<_> = config.into_map().keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "compilerOptions"]);
    }
}
