//! Filesystem access for config resolution
//!
//! All discovery, parsing and rewriting goes through the [`FileSystem`] trait so
//! the pipeline can run against the real disk or a fully in-memory tree.

use crate::{Result, TsconfError};
use dashmap::DashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Trait for the filesystem operations the resolver needs
pub trait FileSystem: Send + Sync {
    /// Whether anything (file or directory) exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Whether `path` is a regular file
    fn is_file(&self, path: &Path) -> bool;

    /// Read the whole file as UTF-8 text
    fn read_text(&self, path: &Path) -> Result<String>;

    /// Replace the file's content with `content`
    fn write_text(&self, path: &Path, content: &str) -> Result<()>;
}

/// Filesystem backed by `std::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_text(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).map_err(|e| TsconfError::io_error(path, e))
    }

    fn write_text(&self, path: &Path, content: &str) -> Result<()> {
        std::fs::write(path, content).map_err(|e| TsconfError::io_error(path, e))
    }
}

/// In-memory filesystem for deterministic tests and dry runs
///
/// Directories are implicit: a directory exists when some stored file lives
/// below it.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: DashMap<PathBuf, String>,
    writes: AtomicUsize,
}

impl MemoryFileSystem {
    /// Create an empty in-memory filesystem
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, builder style
    pub fn with_file(self, path: impl AsRef<Path>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    /// Add or replace a file without counting it as a write
    pub fn insert(&self, path: impl AsRef<Path>, content: impl Into<String>) {
        self.files
            .insert(normalize_path(path.as_ref()), content.into());
    }

    /// Current content of a file
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files
            .get(&normalize_path(path.as_ref()))
            .map(|entry| entry.value().clone())
    }

    /// Number of `write_text` calls served so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl FileSystem for MemoryFileSystem {
    fn exists(&self, path: &Path) -> bool {
        let path = normalize_path(path);
        self.files.contains_key(&path)
            || self
                .files
                .iter()
                .any(|entry| entry.key().starts_with(&path))
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.contains_key(&normalize_path(path))
    }

    fn read_text(&self, path: &Path) -> Result<String> {
        self.contents(path).ok_or_else(|| {
            TsconfError::io_error(
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
            )
        })
    }

    fn write_text(&self, path: &Path, content: &str) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.insert(path, content);
        Ok(())
    }
}

/// Lexically normalize a path: drop `.` segments and fold `..` into its parent.
///
/// Symlinks are not consulted, so this works for virtual paths too. Leading
/// `..` segments of a relative path are kept.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    let mut depth = 0usize;

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => {
                normalized.push(component.as_os_str());
                depth = 0;
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if depth > 0 {
                    normalized.pop();
                    depth -= 1;
                } else if !normalized.has_root() {
                    normalized.push("..");
                }
            }
            Component::Normal(segment) => {
                normalized.push(segment);
                depth += 1;
            }
        }
    }

    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}

/// Join two relative path strings the way a POSIX path join does, collapsing
/// `.` and `..` segments. An empty result is `"."`.
pub fn join_posix(dir: &str, path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    let absolute = dir.starts_with('/') || (dir.is_empty() && path.starts_with('/'));

    for segment in dir.split('/').chain(path.split('/')) {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if absolute => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    match (absolute, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Directory part of a slash-separated reference; `"."` when there is none.
pub fn dirname_posix(reference: &str) -> &str {
    match reference.trim_end_matches('/').rfind('/') {
        Some(0) => "/",
        Some(index) => &reference[..index],
        None => ".",
    }
}
