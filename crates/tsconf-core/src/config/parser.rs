//! Config parsing with `extends` resolution

use super::document::TsConfig;
use super::merge::{merge_extended, rebase_base_url};
use crate::fs::{FileSystem, RealFileSystem, normalize_path};
use crate::{Result, TsconfError};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Directory searched for package-style `extends` references
const NODE_MODULES: &str = "node_modules";

/// Reads config files and flattens their `extends` chains
#[derive(Clone)]
pub struct ConfigParser {
    fs: Arc<dyn FileSystem>,
}

impl Default for ConfigParser {
    fn default() -> Self {
        Self::new(Arc::new(RealFileSystem))
    }
}

impl ConfigParser {
    /// Create a parser over the given filesystem
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Parse `config_path` and merge its whole `extends` chain
    ///
    /// Returns `Ok(None)` when the file does not exist. Malformed content is a
    /// hard error, as is an `extends` chain that loops back on itself.
    pub fn parse(&self, config_path: &Path) -> Result<Option<TsConfig>> {
        let mut chain = Vec::new();
        self.parse_chain(config_path, &mut chain)
    }

    /// Parse a single file without following `extends`
    pub fn parse_file(&self, config_path: &Path) -> Result<Option<TsConfig>> {
        if !self.fs.exists(config_path) {
            return Ok(None);
        }

        let content = self.fs.read_text(config_path)?;
        parse_config_text(config_path, &content).map(Some)
    }

    fn parse_chain(&self, config_path: &Path, chain: &mut Vec<PathBuf>) -> Result<Option<TsConfig>> {
        let normalized = normalize_path(config_path);
        if chain.contains(&normalized) {
            return Err(TsconfError::circular_extends(chain, &normalized));
        }

        let Some(config) = self.parse_file(config_path)? else {
            tracing::debug!("Config not found: {}", config_path.display());
            return Ok(None);
        };
        tracing::debug!("Parsed config: {}", config_path.display());

        let Some(reference) = config.extends().map(normalize_reference) else {
            return Ok(Some(config));
        };

        let current_dir = config_path.parent().unwrap_or_else(|| Path::new(""));
        let extended_path = self.resolve_extends(current_dir, &reference);
        tracing::debug!(
            "{} extends {}",
            config_path.display(),
            extended_path.display()
        );

        chain.push(normalized);
        let base = self.parse_chain(&extended_path, chain)?;
        chain.pop();

        let mut base = base.unwrap_or_else(|| {
            tracing::debug!(
                "Extended config {} not found, treating it as empty",
                extended_path.display()
            );
            TsConfig::new()
        });
        rebase_base_url(&mut base, &reference);

        Ok(Some(merge_extended(base, config)))
    }

    /// Resolve an `extends` reference against the directory of the config using it
    ///
    /// A reference containing both `/` and `.` whose relative candidate does not
    /// exist is treated as a package reference under `node_modules`.
    fn resolve_extends(&self, current_dir: &Path, reference: &str) -> PathBuf {
        let candidate = current_dir.join(reference);
        if reference.contains('/') && reference.contains('.') && !self.fs.exists(&candidate) {
            return current_dir.join(NODE_MODULES).join(reference);
        }
        candidate
    }
}

/// Append `.json` to an `extends` reference that does not name a JSON file
pub fn normalize_reference(reference: &str) -> String {
    if reference.contains(".json") {
        reference.to_string()
    } else {
        format!("{reference}.json")
    }
}

/// Parse config text: strip a leading BOM, then parse tolerant JSON
///
/// Comments and trailing commas are accepted (JSON5 is a superset of both).
pub fn parse_config_text(path: &Path, content: &str) -> Result<TsConfig> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let value: Value =
        json5::from_str(content).map_err(|e| TsconfError::parse_error(path, e.to_string()))?;

    TsConfig::from_value(value).map_err(|e| match e {
        TsconfError::ConfigError { message } => {
            TsconfError::config_error(format!("{}: {message}", path.display()))
        }
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use crate::fs::MemoryFileSystem;
    use serde_json::json;

    fn memory_parser(fs: MemoryFileSystem) -> ConfigParser {
        ConfigParser::new(Arc::new(fs))
    }

    #[test]
    fn test_normalize_reference() {
        assert_eq!(normalize_reference("./base"), "./base.json");
        assert_eq!(normalize_reference("./base.json"), "./base.json");
        assert_eq!(normalize_reference("./tsconfig.json5"), "./tsconfig.json5");
        assert_eq!(
            normalize_reference("@tsconfig/node16/tsconfig"),
            "@tsconfig/node16/tsconfig.json"
        );
    }

    #[test]
    fn test_parse_missing_file_returns_none() {
        let parser = memory_parser(MemoryFileSystem::new());
        assert!(parser.parse(Path::new("/repo/tsconfig.json")).unwrap().is_none());
    }

    #[test]
    fn test_parse_strips_bom_and_accepts_comments() {
        let parser = memory_parser(MemoryFileSystem::new().with_file(
            "/repo/tsconfig.json",
            "\u{feff}{\n  // comment\n  \"compilerOptions\": {\n    \"strict\": true, /* trailing */\n  },\n}\n",
        ));

        let config = parser.parse(Path::new("/repo/tsconfig.json")).unwrap().unwrap();
        assert_eq!(config.strict(), Some(true));
    }

    #[test]
    fn test_parse_malformed_is_fatal() {
        let parser = memory_parser(
            MemoryFileSystem::new().with_file("/repo/tsconfig.json", "{ \"compilerOptions\": "),
        );

        let err = parser.parse(Path::new("/repo/tsconfig.json")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(err.to_string().starts_with("/repo/tsconfig.json is malformed"));
    }

    #[test]
    fn test_parse_without_extends_is_returned_as_is() {
        let parser = memory_parser(MemoryFileSystem::new().with_file(
            "/repo/tsconfig.json",
            r#"{ "include": ["app"], "compilerOptions": { "jsx": "preserve" } }"#,
        ));

        let config = parser.parse(Path::new("/repo/tsconfig.json")).unwrap().unwrap();
        assert_eq!(
            config.to_value(),
            json!({ "include": ["app"], "compilerOptions": { "jsx": "preserve" } })
        );
    }

    #[test]
    fn test_descendant_base_url_wins() {
        let parser = memory_parser(
            MemoryFileSystem::new()
                .with_file(
                    "/repo/tsconfig.json",
                    r#"{ "extends": "./base", "compilerOptions": { "baseUrl": "./src" } }"#,
                )
                .with_file(
                    "/repo/base.json",
                    r#"{ "compilerOptions": { "baseUrl": "./lib" } }"#,
                ),
        );

        let config = parser.parse(Path::new("/repo/tsconfig.json")).unwrap().unwrap();
        assert_eq!(config.base_url(), Some("./src"));
    }

    #[test]
    fn test_inherited_base_url_is_rebased() {
        let parser = memory_parser(
            MemoryFileSystem::new()
                .with_file("/repo/app/tsconfig.json", r#"{ "extends": "../configs/base" }"#)
                .with_file(
                    "/repo/configs/base.json",
                    r#"{ "compilerOptions": { "baseUrl": "./lib" } }"#,
                ),
        );

        let config = parser
            .parse(Path::new("/repo/app/tsconfig.json"))
            .unwrap()
            .unwrap();
        assert_eq!(config.base_url(), Some("../configs/lib"));
    }

    #[test]
    fn test_missing_extends_target_is_empty_ancestor() {
        let parser = memory_parser(MemoryFileSystem::new().with_file(
            "/repo/tsconfig.json",
            r#"{ "extends": "./missing", "compilerOptions": { "strict": false } }"#,
        ));

        let config = parser.parse(Path::new("/repo/tsconfig.json")).unwrap().unwrap();
        assert_eq!(config.strict(), Some(false));
        assert_eq!(config.extends(), Some("./missing"));
    }

    #[test]
    fn test_package_reference_resolves_under_node_modules() {
        let parser = memory_parser(
            MemoryFileSystem::new()
                .with_file(
                    "/repo/tsconfig.json",
                    r#"{ "extends": "@tsconfig/node16/tsconfig.json" }"#,
                )
                .with_file(
                    "/repo/node_modules/@tsconfig/node16/tsconfig.json",
                    r#"{ "compilerOptions": { "target": "es2021", "baseUrl": "." } }"#,
                ),
        );

        let config = parser.parse(Path::new("/repo/tsconfig.json")).unwrap().unwrap();
        assert_eq!(config.compiler_option("target"), Some(&json!("es2021")));
        assert_eq!(config.base_url(), Some("@tsconfig/node16"));
    }

    #[test]
    fn test_multi_level_chain() {
        let parser = memory_parser(
            MemoryFileSystem::new()
                .with_file(
                    "/repo/tsconfig.json",
                    r#"{ "extends": "./tsconfig.app.json", "compilerOptions": { "noEmit": true } }"#,
                )
                .with_file(
                    "/repo/tsconfig.app.json",
                    r#"{ "extends": "./tsconfig.base.json", "compilerOptions": { "jsx": "react-jsx" } }"#,
                )
                .with_file(
                    "/repo/tsconfig.base.json",
                    r#"{ "compilerOptions": { "jsx": "preserve", "strict": true } }"#,
                ),
        );

        let config = parser.parse(Path::new("/repo/tsconfig.json")).unwrap().unwrap();
        assert_eq!(config.compiler_option("noEmit"), Some(&json!(true)));
        assert_eq!(config.compiler_option("jsx"), Some(&json!("react-jsx")));
        assert_eq!(config.strict(), Some(true));
    }

    #[test]
    fn test_self_reference_is_circular() {
        let parser = memory_parser(
            MemoryFileSystem::new().with_file("/repo/tsconfig.json", r#"{ "extends": "./tsconfig" }"#),
        );

        let err = parser.parse(Path::new("/repo/tsconfig.json")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CircularExtends);
    }

    #[test]
    fn test_mutual_reference_is_circular() {
        let parser = memory_parser(
            MemoryFileSystem::new()
                .with_file("/repo/a.json", r#"{ "extends": "./b" }"#)
                .with_file("/repo/b.json", r#"{ "extends": "./sub/../a.json" }"#),
        );

        let err = parser.parse(Path::new("/repo/a.json")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CircularExtends);
        assert!(err.to_string().contains("/repo/a.json -> /repo/b.json -> /repo/a.json"));
    }

    #[test]
    fn test_non_object_document_is_config_error() {
        let parser = memory_parser(MemoryFileSystem::new().with_file("/repo/tsconfig.json", "[]"));

        let err = parser.parse(Path::new("/repo/tsconfig.json")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.to_string().contains("/repo/tsconfig.json"));
    }
}
