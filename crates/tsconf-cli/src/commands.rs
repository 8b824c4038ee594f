//! Command implementations

use crate::output::{self, ConsoleReporter};
use crate::{OutputFormat, Outcome};
use anyhow::Context;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use tsconf_core::{ConfigLoader, PolicyTable, SuggestionRule};

/// Options shared by every command
#[derive(Debug, Clone)]
pub struct Settings {
    pub policy: Option<PathBuf>,
    pub rule: SuggestionRule,
    pub format: OutputFormat,
}

impl Settings {
    fn policy_table(&self) -> anyhow::Result<PolicyTable> {
        match &self.policy {
            Some(path) => {
                debug!("Loading policy from {}", path.display());
                PolicyTable::load(path)
                    .with_context(|| format!("Failed to load policy {}", path.display()))
            }
            None => Ok(PolicyTable::default()),
        }
    }

    fn loader(&self) -> anyhow::Result<ConfigLoader> {
        Ok(ConfigLoader::default()
            .with_policy(self.policy_table()?)
            .with_suggestion_rule(self.rule)
            .with_reporter(Arc::new(ConsoleReporter)))
    }
}

/// Run the full pipeline and print the loader result
pub fn load_command(start: &Path, settings: &Settings) -> anyhow::Result<Outcome> {
    debug!("Loading config for {}", start.display());

    let result = settings
        .loader()?
        .load(start)
        .with_context(|| format!("Failed to load config for {}", start.display()))?;

    output::print_loader_result(&result, settings.format)?;
    Ok(Outcome::Clean)
}

/// Plan the policy without writing and report what would change
pub fn check_command(start: &Path, settings: &Settings) -> anyhow::Result<Outcome> {
    debug!("Checking config for {}", start.display());

    let loader = settings.loader()?;
    let Some((config_path, mut config)) = loader
        .resolve(start)
        .with_context(|| format!("Failed to resolve config for {}", start.display()))?
    else {
        output::print_no_config(start, settings.format)?;
        return Ok(Outcome::Clean);
    };

    let report = loader.defaults_writer().plan(&mut config);
    output::print_check(&config_path, &report, settings.format)?;

    if report.is_empty() {
        Ok(Outcome::Clean)
    } else {
        Ok(Outcome::ChangesPending)
    }
}

/// Print the resolved config
pub fn show_command(start: &Path, settings: &Settings) -> anyhow::Result<Outcome> {
    debug!("Showing resolved config for {}", start.display());

    let loader = settings.loader()?;
    let Some((config_path, config)) = loader
        .resolve(start)
        .with_context(|| format!("Failed to resolve config for {}", start.display()))?
    else {
        output::print_no_config(start, settings.format)?;
        return Ok(Outcome::Clean);
    };

    output::print_config(&config_path, &config, settings.format)?;
    Ok(Outcome::Clean)
}

/// Print the active policy table
pub fn policy_command(settings: &Settings) -> anyhow::Result<Outcome> {
    let policy = settings.policy_table()?;
    output::print_policy(&policy, settings.format)?;
    Ok(Outcome::Clean)
}
