//! Config file discovery

use crate::fs::{FileSystem, RealFileSystem, normalize_path};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Config file names checked in each directory, in priority order
pub const CONFIG_FILE_NAMES: &[&str] = &["tsconfig.json", "jsconfig.json"];

/// Locates the config file that applies to a starting path
#[derive(Clone)]
pub struct ConfigLocator {
    fs: Arc<dyn FileSystem>,
}

impl Default for ConfigLocator {
    fn default() -> Self {
        Self::new(Arc::new(RealFileSystem))
    }
}

impl ConfigLocator {
    /// Create a locator over the given filesystem
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Find the config for `cwd`
    ///
    /// If `cwd` is a regular file it is returned (made absolute) as an explicit
    /// override. Otherwise the directory tree is walked upward, checking
    /// `tsconfig.json` then `jsconfig.json` in each directory, until a config
    /// is found or the filesystem root has been checked.
    pub fn locate(&self, cwd: &Path) -> Option<PathBuf> {
        let start = absolute(cwd);

        if self.fs.is_file(&start) {
            tracing::debug!("Using explicit config file: {}", start.display());
            return Some(start);
        }

        let mut current = start.as_path();
        loop {
            for filename in CONFIG_FILE_NAMES {
                let config_path = current.join(filename);
                if self.fs.exists(&config_path) {
                    tracing::debug!("Found config: {}", config_path.display());
                    return Some(config_path);
                }
            }

            // Move up to parent directory
            match current.parent() {
                Some(parent) if parent != current => current = parent,
                _ => break,
            }
        }

        tracing::debug!("No config file found above {}", start.display());
        None
    }
}

/// Make `path` absolute against the process working directory, lexically
fn absolute(path: &Path) -> PathBuf {
    let path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
    };
    normalize_path(&path)
}
