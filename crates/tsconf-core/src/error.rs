//! Error types and handling for config resolution

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for config resolution operations
#[derive(Debug, Error)]
pub enum TsconfError {
    /// The config file is not valid JSON, even under tolerant parsing
    #[error("{} is malformed: {message}", path.display())]
    ParseError { path: PathBuf, message: String },

    /// The config document or a policy file has an unexpected shape
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// An `extends` chain refers back to a config already being resolved
    #[error("Circular extends detected: {chain}")]
    CircularExtends { chain: String },

    /// File system I/O errors
    #[error("IO error for path '{}': {source}", path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serializing a config back to JSON failed
    #[error("Serialization error: {message}")]
    SerializeError { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Config,
    CircularExtends,
    Io,
    Serialize,
}

impl TsconfError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            TsconfError::ParseError { .. } => ErrorKind::Parse,
            TsconfError::ConfigError { .. } => ErrorKind::Config,
            TsconfError::CircularExtends { .. } => ErrorKind::CircularExtends,
            TsconfError::IoError { .. } => ErrorKind::Io,
            TsconfError::SerializeError { .. } => ErrorKind::Serialize,
        }
    }

    /// Create a parse error for a specific file
    pub fn parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a circular extends error from the chain of visited configs
    pub fn circular_extends(chain: &[PathBuf], repeated: &std::path::Path) -> Self {
        let chain = chain
            .iter()
            .map(|p| p.display().to_string())
            .chain(std::iter::once(repeated.display().to_string()))
            .collect::<Vec<_>>()
            .join(" -> ");
        Self::CircularExtends { chain }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    /// Create a serialization error
    pub fn serialize_error(message: impl Into<String>) -> Self {
        Self::SerializeError {
            message: message.into(),
        }
    }
}
