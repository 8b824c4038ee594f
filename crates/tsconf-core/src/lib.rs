//! tsconf core
//!
//! Locates the `tsconfig.json`/`jsconfig.json` governing a directory, resolves
//! its `extends` chain, and reconciles it against a table of desired compiler
//! options, rewriting the file when something had to change.

pub mod config;
pub mod defaults;
pub mod error;
pub mod fs;
pub mod policy;
pub mod reporter;
pub mod result;

// Re-export commonly used types
pub use config::{
    CONFIG_FILE_NAMES, ConfigLoader, ConfigLocator, ConfigParser, LoaderResult, TsConfig,
};
pub use defaults::{ChangeReport, ConfigChange, DefaultsWriter, SuggestionRule};
pub use error::{ErrorKind, TsconfError};
pub use fs::{FileSystem, MemoryFileSystem, RealFileSystem};
pub use policy::{DEFAULT_INCLUDE, PolicyEntry, PolicyTable, PolicyTableBuilder};
pub use reporter::{ChangeReporter, RecordingReporter, SilentReporter, TracingReporter};
pub use result::Result;

/// Default filter used when `RUST_LOG` is not set
pub const DEFAULT_LOG_DIRECTIVE: &str = "tsconf=info";

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    init_tracing_with(DEFAULT_LOG_DIRECTIVE);
}

/// Initialize tracing with `directive` as the fallback filter
///
/// `RUST_LOG` still takes precedence. Calling this twice is harmless; the
/// second subscriber is ignored.
pub fn init_tracing_with(directive: &str) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false),
        )
        .try_init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
