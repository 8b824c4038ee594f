//! Desired compiler options
//!
//! A [`PolicyTable`] says which `compilerOptions` should be filled in when
//! missing (suggested) and which must hold a specific value (required). Tables
//! are immutable values: the baseline comes from [`PolicyTable::default`],
//! alternatives are built with [`PolicyTable::builder`] or loaded from TOML.
//!
//! ```toml
//! include = ["env.d.ts", "**/*.ts", "**/*.tsx"]
//!
//! [suggested]
//! target = "ES2019"
//! strict = true
//!
//! [required.noEmit]
//! value = true
//! reason = "the bundler emits the output"
//! ```

use crate::{Result, TsconfError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::path::Path;

/// Globs written to `include` when a config has none
pub const DEFAULT_INCLUDE: &[&str] = &["remix.env.d.ts", "**/*.ts", "**/*.tsx"];

/// How a single compiler option is enforced
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PolicyEntry {
    /// Applied only when the option is unset
    Suggested { value: Value },
    /// Applied whenever the current value differs
    Required { value: Value, reason: String },
}

impl PolicyEntry {
    /// Create a suggested entry
    pub fn suggested(value: impl Into<Value>) -> Self {
        Self::Suggested {
            value: value.into(),
        }
    }

    /// Create a required entry with the reason shown to the user
    pub fn required(value: impl Into<Value>, reason: impl Into<String>) -> Self {
        Self::Required {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// The desired value
    pub fn value(&self) -> &Value {
        match self {
            PolicyEntry::Suggested { value } | PolicyEntry::Required { value, .. } => value,
        }
    }

    /// Whether the entry overrides existing values
    pub fn is_required(&self) -> bool {
        matches!(self, PolicyEntry::Required { .. })
    }
}

/// Ordered table of desired compiler options plus the default `include` list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyTable {
    options: IndexMap<String, PolicyEntry>,
    include: Vec<String>,
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self::builder()
            .suggested("target", "ES2019")
            .suggested("lib", json!(["DOM", "DOM.Iterable", "ES2019"]))
            .suggested("allowJs", true)
            .suggested("strict", true)
            .suggested("baseUrl", ".")
            .suggested("forceConsistentCasingInFileNames", true)
            .required(
                "esModuleInterop",
                true,
                "default imports of CommonJS modules must work",
            )
            .required(
                "isolatedModules",
                true,
                "every file is compiled on its own by the bundler",
            )
            .required("jsx", "react-jsx", "the automatic React JSX runtime is used")
            .required(
                "moduleResolution",
                "node",
                "imports are resolved with the Node.js algorithm",
            )
            .required(
                "resolveJsonModule",
                true,
                "JSON files can be imported as modules",
            )
            .required(
                "noEmit",
                true,
                "the compiler only type checks, the bundler emits the output",
            )
            .build()
    }
}

impl PolicyTable {
    /// Start an empty table using [`DEFAULT_INCLUDE`]
    pub fn builder() -> PolicyTableBuilder {
        PolicyTableBuilder {
            options: IndexMap::new(),
            include: DEFAULT_INCLUDE.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Option name → entry, in table order
    pub fn desired_options(&self) -> &IndexMap<String, PolicyEntry> {
        &self.options
    }

    /// Globs used when a config has no `include`
    pub fn default_include(&self) -> &[String] {
        &self.include
    }

    /// Look up a single option
    pub fn get(&self, option: &str) -> Option<&PolicyEntry> {
        self.options.get(option)
    }

    /// Suggested entries, in table order
    pub fn suggested(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.options.iter().filter_map(|(name, entry)| match entry {
            PolicyEntry::Suggested { value } => Some((name.as_str(), value)),
            PolicyEntry::Required { .. } => None,
        })
    }

    /// Required entries with their reasons, in table order
    pub fn required(&self) -> impl Iterator<Item = (&str, &Value, &str)> {
        self.options.iter().filter_map(|(name, entry)| match entry {
            PolicyEntry::Required { value, reason } => {
                Some((name.as_str(), value, reason.as_str()))
            }
            PolicyEntry::Suggested { .. } => None,
        })
    }

    /// Load a policy table from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| TsconfError::io_error(path, e))?;
        Self::from_toml_str(&content).map_err(|e| match e {
            TsconfError::ConfigError { message } => TsconfError::config_error(format!(
                "Failed to load policy from '{}': {message}",
                path.display()
            )),
            other => other,
        })
    }

    /// Parse a policy table from TOML text
    ///
    /// The loaded table replaces the baseline entirely; `include` falls back to
    /// [`DEFAULT_INCLUDE`] when omitted.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: PolicyFile = toml::from_str(content)
            .map_err(|e| TsconfError::config_error(format!("Invalid policy TOML: {e}")))?;

        let mut builder = Self::builder();
        if let Some(include) = file.include {
            builder = builder.include(include);
        }
        for (name, value) in file.suggested {
            builder = builder.suggested(name, value);
        }
        for (name, required) in file.required {
            if builder.options.contains_key(&name) {
                return Err(TsconfError::config_error(format!(
                    "Option '{name}' is listed as both suggested and required"
                )));
            }
            builder = builder.required(name, required.value, required.reason);
        }

        Ok(builder.build())
    }
}

/// Builder for [`PolicyTable`]
#[derive(Debug, Clone)]
pub struct PolicyTableBuilder {
    options: IndexMap<String, PolicyEntry>,
    include: Vec<String>,
}

impl PolicyTableBuilder {
    /// Add a suggested option
    pub fn suggested(mut self, option: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options
            .insert(option.into(), PolicyEntry::suggested(value));
        self
    }

    /// Add a required option
    pub fn required(
        mut self,
        option: impl Into<String>,
        value: impl Into<Value>,
        reason: impl Into<String>,
    ) -> Self {
        self.options
            .insert(option.into(), PolicyEntry::required(value, reason));
        self
    }

    /// Replace the default `include` globs
    pub fn include<I, S>(mut self, include: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include = include.into_iter().map(Into::into).collect();
        self
    }

    /// Finish the table
    pub fn build(self) -> PolicyTable {
        PolicyTable {
            options: self.options,
            include: self.include,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PolicyFile {
    include: Option<Vec<String>>,
    #[serde(default)]
    suggested: IndexMap<String, Value>,
    #[serde(default)]
    required: IndexMap<String, RequiredOption>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RequiredOption {
    value: Value,
    reason: String,
}
