//! End-to-end config loading

use super::document::TsConfig;
use super::locator::ConfigLocator;
use super::parser::ConfigParser;
use crate::Result;
use crate::defaults::{DefaultsWriter, SuggestionRule};
use crate::fs::{FileSystem, RealFileSystem};
use crate::policy::PolicyTable;
use crate::reporter::{ChangeReporter, TracingReporter};
use indexmap::IndexMap;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Outcome of [`ConfigLoader::load`]
///
/// `base_url` and `paths` are only ever present together with `config_path`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoaderResult {
    /// The config file that was used, if one was found
    pub config_path: Option<PathBuf>,
    /// Resolved `compilerOptions.baseUrl`
    pub base_url: Option<String>,
    /// Resolved `compilerOptions.paths`
    pub paths: Option<IndexMap<String, Vec<String>>>,
}

impl LoaderResult {
    fn from_config(config_path: PathBuf, config: &TsConfig) -> Self {
        Self {
            config_path: Some(config_path),
            base_url: config.base_url().map(str::to_string),
            paths: config.paths(),
        }
    }
}

/// Locates, resolves and reconciles the config for a directory
///
/// ```no_run
/// use tsconf_core::ConfigLoader;
///
/// let result = ConfigLoader::default().load(std::path::Path::new("."))?;
/// if let Some(path) = &result.config_path {
///     println!("{}", path.display());
/// }
/// # Ok::<(), tsconf_core::TsconfError>(())
/// ```
#[derive(Clone)]
pub struct ConfigLoader {
    fs: Arc<dyn FileSystem>,
    policy: Arc<PolicyTable>,
    rule: SuggestionRule,
    reporter: Arc<dyn ChangeReporter>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self {
            fs: Arc::new(RealFileSystem),
            policy: Arc::new(PolicyTable::default()),
            rule: SuggestionRule::default(),
            reporter: Arc::new(TracingReporter),
        }
    }
}

impl ConfigLoader {
    /// Read and write through `fs` instead of the real filesystem
    pub fn with_file_system(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    /// Reconcile against `policy` instead of the baseline table
    pub fn with_policy(mut self, policy: PolicyTable) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    /// Choose when suggested options are filled in
    pub fn with_suggestion_rule(mut self, rule: SuggestionRule) -> Self {
        self.rule = rule;
        self
    }

    /// Send change reports to `reporter`
    pub fn with_reporter(mut self, reporter: Arc<dyn ChangeReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// The policy this loader reconciles against
    pub fn policy(&self) -> &PolicyTable {
        &self.policy
    }

    pub fn locator(&self) -> ConfigLocator {
        ConfigLocator::new(self.fs.clone())
    }

    pub fn parser(&self) -> ConfigParser {
        ConfigParser::new(self.fs.clone())
    }

    pub fn defaults_writer(&self) -> DefaultsWriter {
        DefaultsWriter::new(self.fs.clone(), self.policy.clone()).with_rule(self.rule)
    }

    /// Run the full pipeline for `cwd`
    ///
    /// Finding no config is not an error and yields an empty result. The
    /// config file is rewritten when the policy changed it, and the changes
    /// are handed to the reporter.
    pub fn load(&self, cwd: &Path) -> Result<LoaderResult> {
        let Some(config_path) = self.locator().locate(cwd) else {
            tracing::debug!("No config found for {}", cwd.display());
            return Ok(LoaderResult::default());
        };

        let Some(mut config) = self.parser().parse(&config_path)? else {
            tracing::debug!("{} disappeared before it could be read", config_path.display());
            return Ok(LoaderResult {
                config_path: Some(config_path),
                ..LoaderResult::default()
            });
        };

        let report = self.defaults_writer().reconcile(&mut config, &config_path)?;
        if !report.is_empty() {
            self.reporter.report(&report, &config_path);
        }

        Ok(LoaderResult::from_config(config_path, &config))
    }

    /// Locate and resolve the config for `cwd` without reconciling it
    pub fn resolve(&self, cwd: &Path) -> Result<Option<(PathBuf, TsConfig)>> {
        let Some(config_path) = self.locator().locate(cwd) else {
            return Ok(None);
        };
        Ok(self
            .parser()
            .parse(&config_path)?
            .map(|config| (config_path, config)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use crate::fs::MemoryFileSystem;
    use crate::reporter::RecordingReporter;
    use serde_json::json;

    fn loader(fs: &Arc<MemoryFileSystem>) -> (ConfigLoader, Arc<RecordingReporter>) {
        let reporter = Arc::new(RecordingReporter::new());
        let loader = ConfigLoader::default()
            .with_file_system(fs.clone())
            .with_reporter(reporter.clone());
        (loader, reporter)
    }

    #[test]
    fn test_load_without_config_is_empty() {
        let fs = Arc::new(MemoryFileSystem::new().with_file("/repo/package.json", "{}"));
        let (loader, reporter) = loader(&fs);

        let result = loader.load(Path::new("/repo/app")).unwrap();

        assert_eq!(result, LoaderResult::default());
        assert!(reporter.reports().is_empty());
        assert_eq!(fs.write_count(), 0);
    }

    #[test]
    fn test_load_reports_and_writes_changes() {
        let fs = Arc::new(MemoryFileSystem::new().with_file(
            "/repo/tsconfig.json",
            r#"{ "compilerOptions": { "esModuleInterop": false, "paths": { "~/*": ["./app/*"] } } }"#,
        ));
        let (loader, reporter) = loader(&fs);

        let result = loader.load(Path::new("/repo/app")).unwrap();

        assert_eq!(result.config_path, Some(PathBuf::from("/repo/tsconfig.json")));
        assert_eq!(result.base_url.as_deref(), Some("."));
        let paths = result.paths.unwrap();
        assert_eq!(paths["~/*"], vec!["./app/*".to_string()]);

        let reports = reporter.reports();
        assert_eq!(reports.len(), 1);
        assert!(
            reports[0]
                .required
                .iter()
                .any(|change| change.option == "esModuleInterop")
        );
        assert_eq!(fs.write_count(), 1);

        let written: serde_json::Value =
            serde_json::from_str(&fs.contents("/repo/tsconfig.json").unwrap()).unwrap();
        assert_eq!(written["compilerOptions"]["esModuleInterop"], json!(true));
        assert_eq!(written["compilerOptions"]["strict"], json!(true));
    }

    #[test]
    fn test_second_load_is_silent() {
        let fs = Arc::new(MemoryFileSystem::new().with_file("/repo/jsconfig.json", "{}"));
        let (loader, reporter) = loader(&fs);

        let first = loader.load(Path::new("/repo")).unwrap();
        let second = loader.load(Path::new("/repo")).unwrap();

        assert_eq!(first, second);
        assert_eq!(reporter.reports().len(), 1);
        assert_eq!(fs.write_count(), 1);
    }

    #[test]
    fn test_load_inherited_base_url() {
        let fs = Arc::new(
            MemoryFileSystem::new()
                .with_file("/repo/tsconfig.json", r#"{ "extends": "./base" }"#)
                .with_file(
                    "/repo/base.json",
                    r#"{ "compilerOptions": { "baseUrl": "./lib" } }"#,
                ),
        );
        let (loader, _) = loader(&fs);

        let result = loader.load(Path::new("/repo")).unwrap();

        assert_eq!(result.base_url.as_deref(), Some("lib"));
        assert_eq!(result.paths, None);
    }

    #[test]
    fn test_load_skips_non_string_path_entries() {
        let fs = Arc::new(MemoryFileSystem::new().with_file(
            "/repo/tsconfig.json",
            r#"{ "compilerOptions": { "paths": { "@/*": ["./src/*", 42] } } }"#,
        ));
        let (loader, _) = loader(&fs);

        let result = loader.load(Path::new("/repo")).unwrap();

        assert_eq!(result.paths.unwrap()["@/*"], vec!["./src/*".to_string()]);
    }

    #[test]
    fn test_load_propagates_parse_errors() {
        let fs = Arc::new(MemoryFileSystem::new().with_file("/repo/tsconfig.json", "{ oops"));
        let (loader, reporter) = loader(&fs);

        let err = loader.load(Path::new("/repo")).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(reporter.reports().is_empty());
        assert_eq!(fs.write_count(), 0);
    }

    #[test]
    fn test_custom_policy_and_rule() {
        let fs = Arc::new(MemoryFileSystem::new().with_file(
            "/repo/tsconfig.json",
            r#"{ "strict": false, "include": ["src"], "compilerOptions": {} }"#,
        ));
        let (loader, reporter) = loader(&fs);
        let loader = loader
            .with_policy(PolicyTable::builder().suggested("strict", true).build())
            .with_suggestion_rule(SuggestionRule::CompilerOptionsOnly);

        loader.load(Path::new("/repo")).unwrap();

        let reports = reporter.reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].suggested.len(), 1);
        assert_eq!(reports[0].suggested[0].option, "strict");
    }

    #[test]
    fn test_resolve_does_not_write() {
        let fs = Arc::new(
            MemoryFileSystem::new()
                .with_file("/repo/tsconfig.json", r#"{ "extends": "./base.json" }"#)
                .with_file("/repo/base.json", r#"{ "compilerOptions": { "strict": false } }"#),
        );
        let (loader, reporter) = loader(&fs);

        let (path, config) = loader.resolve(Path::new("/repo")).unwrap().unwrap();

        assert_eq!(path, PathBuf::from("/repo/tsconfig.json"));
        assert_eq!(config.strict(), Some(false));
        assert_eq!(fs.write_count(), 0);
        assert!(reporter.reports().is_empty());
        assert!(loader.resolve(Path::new("/elsewhere")).unwrap().is_none());
    }
}
