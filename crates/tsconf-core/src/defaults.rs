//! Reconciling a config against a [`PolicyTable`]
//!
//! [`DefaultsWriter::reconcile`] fills in suggested options, forces required
//! ones, adds a default `include` list, and rewrites the file only when
//! something actually changed. The outcome is a structured [`ChangeReport`];
//! rendering it is left to a [`ChangeReporter`](crate::ChangeReporter).

use crate::config::TsConfig;
use crate::fs::{FileSystem, RealFileSystem};
use crate::policy::PolicyTable;
use crate::Result;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Option name recorded when the default `include` list is added
pub const INCLUDE_OPTION: &str = "include";

/// Predicate deciding whether a suggested option should be filled in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuggestionRule {
    /// Skip the suggestion when the option name exists as a *top-level* key of
    /// the config or is already set in `compilerOptions`.
    ///
    /// Compiler options never appear at the top level of a well-formed config,
    /// so in practice this fills every option missing from `compilerOptions`.
    #[default]
    TopLevelKeyCheck,
    /// Skip the suggestion only when the option is set in `compilerOptions`.
    CompilerOptionsOnly,
}

impl SuggestionRule {
    /// Whether `option` should receive its suggested value
    pub fn applies(&self, config: &TsConfig, option: &str) -> bool {
        let unset = config.compiler_option(option).is_none();
        match self {
            SuggestionRule::TopLevelKeyCheck => !config.contains_key(option) && unset,
            SuggestionRule::CompilerOptionsOnly => unset,
        }
    }
}

/// A single change made to a config
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigChange {
    /// Option name (`include` for the include list)
    pub option: String,
    /// Value after the change
    pub value: Value,
    /// Why the change was mandatory; only set for required options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl fmt::Display for ConfigChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} was set to `{}`", self.option, self.value)?;
        if let Some(reason) = &self.reason {
            write!(f, " ({reason})")?;
        }
        Ok(())
    }
}

/// Changes made by one reconcile pass, split by kind
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChangeReport {
    /// Gaps filled from suggested options (and the include default)
    pub suggested: Vec<ConfigChange>,
    /// Values overwritten because an option is required
    pub required: Vec<ConfigChange>,
}

impl ChangeReport {
    /// Whether nothing changed
    pub fn is_empty(&self) -> bool {
        self.suggested.is_empty() && self.required.is_empty()
    }

    /// Total number of changes
    pub fn len(&self) -> usize {
        self.suggested.len() + self.required.len()
    }
}

/// Applies a policy table to configs and persists the result
#[derive(Clone)]
pub struct DefaultsWriter {
    fs: Arc<dyn FileSystem>,
    policy: Arc<PolicyTable>,
    rule: SuggestionRule,
}

impl Default for DefaultsWriter {
    fn default() -> Self {
        Self::new(Arc::new(RealFileSystem), Arc::new(PolicyTable::default()))
    }
}

impl DefaultsWriter {
    /// Create a writer for the given filesystem and policy
    pub fn new(fs: Arc<dyn FileSystem>, policy: Arc<PolicyTable>) -> Self {
        Self {
            fs,
            policy,
            rule: SuggestionRule::default(),
        }
    }

    /// Use a different suggestion rule
    pub fn with_rule(mut self, rule: SuggestionRule) -> Self {
        self.rule = rule;
        self
    }

    /// The active policy table
    pub fn policy(&self) -> &PolicyTable {
        &self.policy
    }

    /// Apply the policy to `config` in memory without touching the disk
    pub fn plan(&self, config: &mut TsConfig) -> ChangeReport {
        let mut report = ChangeReport::default();

        for (option, value) in self.policy.suggested() {
            if self.rule.applies(config, option) {
                config.set_compiler_option(option, value.clone());
                report.suggested.push(ConfigChange {
                    option: option.to_string(),
                    value: value.clone(),
                    reason: None,
                });
            }
        }

        for (option, value, reason) in self.policy.required() {
            if config.compiler_option(option) != Some(value) {
                config.set_compiler_option(option, value.clone());
                report.required.push(ConfigChange {
                    option: option.to_string(),
                    value: value.clone(),
                    reason: Some(reason.to_string()),
                });
            }
        }

        if !config.contains_key(INCLUDE_OPTION) {
            let include = self.policy.default_include();
            config.set_include(include);
            report.suggested.push(ConfigChange {
                option: INCLUDE_OPTION.to_string(),
                value: Value::from(include.to_vec()),
                reason: None,
            });
        }

        report
    }

    /// Apply the policy to `config` and rewrite `config_path` if anything changed
    ///
    /// The file is written as pretty-printed JSON (2-space indent), so comments
    /// and original formatting are lost. With no changes nothing is written.
    pub fn reconcile(&self, config: &mut TsConfig, config_path: &Path) -> Result<ChangeReport> {
        let report = self.plan(config);
        if report.is_empty() {
            tracing::debug!("{} already satisfies the policy", config_path.display());
            return Ok(report);
        }

        let content = config.to_pretty_json()?;
        self.fs.write_text(config_path, &content)?;
        tracing::info!(
            "Updated {} ({} suggested, {} required change(s))",
            config_path.display(),
            report.suggested.len(),
            report.required.len()
        );

        Ok(report)
    }
}
