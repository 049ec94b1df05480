//! Filesystem service used by the enrichment steps.
//!
//! All artifact writes, workspace removals and existence probes go through
//! [`Filesystem`] so tests can observe or fail them.

use camino::{Utf8Path, Utf8PathBuf};
use std::io;

/// An I/O failure tagged with the operation and path involved.
#[derive(Debug, thiserror::Error)]
#[error("failed to {operation} {path}: {source}")]
pub struct FsError {
    /// Short verb naming the failed operation (`copy`, `remove`, ...).
    pub operation: &'static str,
    /// Path the operation acted on.
    pub path: Utf8PathBuf,
    /// Underlying I/O error.
    #[source]
    pub source: io::Error,
}

impl FsError {
    /// Tag an I/O error with its operation and path.
    #[must_use]
    pub fn new(operation: &'static str, path: &Utf8Path, source: io::Error) -> Self {
        Self {
            operation,
            path: path.to_owned(),
            source,
        }
    }
}

/// Blocking filesystem operations, mockable in tests.
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem {
    /// Whether `path` exists.
    ///
    /// # Errors
    ///
    /// Returns [`FsError`] when existence cannot be determined.
    fn exists(&self, path: &Utf8Path) -> Result<bool, FsError>;

    /// Copy the file at `source` to `target`, creating the target directory.
    ///
    /// # Errors
    ///
    /// Returns [`FsError`] when the copy fails.
    fn copy(&self, source: &Utf8Path, target: &Utf8Path) -> Result<(), FsError>;

    /// Write `contents` to `target`, creating the target directory.
    ///
    /// # Errors
    ///
    /// Returns [`FsError`] when the write fails.
    fn write(&self, target: &Utf8Path, contents: &[u8]) -> Result<(), FsError>;

    /// Remove a file or directory tree. Removing a missing path succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`FsError`] when removal fails.
    fn remove(&self, path: &Utf8Path) -> Result<(), FsError>;

    /// Create `path` and all missing parents.
    ///
    /// # Errors
    ///
    /// Returns [`FsError`] when a directory cannot be created.
    fn create_dir_all(&self, path: &Utf8Path) -> Result<(), FsError>;
}

/// [`Filesystem`] backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    fn ensure_parent(target: &Utf8Path) -> Result<(), FsError> {
        match target.parent() {
            Some(parent) if !parent.as_str().is_empty() => std::fs::create_dir_all(parent)
                .map_err(|source| FsError::new("create directory", parent, source)),
            _ => Ok(()),
        }
    }
}

impl Filesystem for LocalFilesystem {
    fn exists(&self, path: &Utf8Path) -> Result<bool, FsError> {
        path.as_std_path()
            .try_exists()
            .map_err(|source| FsError::new("inspect", path, source))
    }

    fn copy(&self, source: &Utf8Path, target: &Utf8Path) -> Result<(), FsError> {
        Self::ensure_parent(target)?;
        std::fs::copy(source, target)
            .map(|_bytes| ())
            .map_err(|error| FsError::new("copy", source, error))
    }

    fn write(&self, target: &Utf8Path, contents: &[u8]) -> Result<(), FsError> {
        Self::ensure_parent(target)?;
        std::fs::write(target, contents).map_err(|source| FsError::new("write", target, source))
    }

    fn remove(&self, path: &Utf8Path) -> Result<(), FsError> {
        let metadata = match std::fs::symlink_metadata(path) {
            Ok(metadata) => metadata,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(error) => return Err(FsError::new("remove", path, error)),
        };
        let result = if metadata.is_dir() {
            std::fs::remove_dir_all(path)
        } else {
            std::fs::remove_file(path)
        };
        result.map_err(|source| FsError::new("remove", path, source))
    }

    fn create_dir_all(&self, path: &Utf8Path) -> Result<(), FsError> {
        std::fs::create_dir_all(path)
            .map_err(|source| FsError::new("create directory", path, source))
    }
}
