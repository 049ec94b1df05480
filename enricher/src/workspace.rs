//! Ephemeral extraction workspaces.
//!
//! Every extraction unpacks into a fresh directory named
//! `{prefix}-{id}` under the workspace root, where `id` comes from an
//! injected [`IdGenerator`]. The returned [`ExtractionWorkspace`] owns that
//! directory and removes it when dropped, so cleanup runs on every exit path
//! of the step that created it, including early returns through `?`.

use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, warn};
use std::cell::Cell;

use crate::error::{EnrichError, Result};
use crate::extraction::ArchiveExtractor;
use crate::fs::Filesystem;

/// Source of unique workspace name tokens.
#[cfg_attr(test, mockall::automock)]
pub trait IdGenerator {
    /// Return a token not handed out before.
    fn next_id(&self) -> String;
}

/// Random UUID v4 tokens.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }
}

/// Deterministic counter tokens (`1`, `2`, ...).
///
/// Unique within one generator only; use it where workspace names must be
/// predictable.
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    last: Cell<u64>,
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> String {
        let next = self.last.get().saturating_add(1);
        self.last.set(next);
        next.to_string()
    }
}

/// Creates extraction workspaces under a common root.
pub struct WorkspaceFactory<'a> {
    root: Utf8PathBuf,
    ids: &'a dyn IdGenerator,
    fs: &'a dyn Filesystem,
    extractor: &'a dyn ArchiveExtractor,
}

impl<'a> WorkspaceFactory<'a> {
    /// Create a factory placing workspaces under `root`.
    #[must_use]
    pub fn new(
        root: Utf8PathBuf,
        ids: &'a dyn IdGenerator,
        fs: &'a dyn Filesystem,
        extractor: &'a dyn ArchiveExtractor,
    ) -> Self {
        Self {
            root,
            ids,
            fs,
            extractor,
        }
    }

    /// Extract `archive` into a fresh workspace named after `prefix`.
    ///
    /// The workspace guard exists before extraction starts, so a partially
    /// unpacked directory is removed when extraction fails.
    ///
    /// # Errors
    ///
    /// Returns [`EnrichError::Fs`] when the directory cannot be created and
    /// [`EnrichError::Extraction`] when the archive cannot be unpacked.
    pub fn extract(&self, prefix: &str, archive: &Utf8Path) -> Result<ExtractionWorkspace<'a>> {
        let path = self.root.join(format!("{prefix}-{}", self.ids.next_id()));
        let workspace = ExtractionWorkspace {
            path,
            fs: self.fs,
        };

        self.fs.create_dir_all(workspace.path())?;
        let files = self
            .extractor
            .extract(archive, workspace.path())
            .map_err(|source| EnrichError::Extraction {
                archive: archive.to_owned(),
                source,
            })?;
        debug!(
            "Extracted {} file(s) from {archive} into {}",
            files.len(),
            workspace.path()
        );

        Ok(workspace)
    }
}

/// A directory holding one archive's extracted contents.
///
/// Removed when dropped; removal failures are logged, never raised.
pub struct ExtractionWorkspace<'a> {
    path: Utf8PathBuf,
    fs: &'a dyn Filesystem,
}

impl ExtractionWorkspace<'_> {
    /// Root directory of the extracted contents.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Locate `relative` inside the workspace.
    ///
    /// # Errors
    ///
    /// Returns [`EnrichError::MissingSourceFile`] when the file is absent and
    /// [`EnrichError::Fs`] when its existence cannot be determined.
    pub fn locate(&self, relative: &str) -> Result<Utf8PathBuf> {
        let candidate = self.path.join(relative);
        if self.fs.exists(&candidate)? {
            Ok(candidate)
        } else {
            Err(EnrichError::MissingSourceFile {
                file: relative.to_owned(),
                workspace: self.path.clone(),
            })
        }
    }
}

impl Drop for ExtractionWorkspace<'_> {
    fn drop(&mut self) {
        match self.fs.remove(&self.path) {
            Ok(()) => debug!("Removed extraction workspace {}", self.path),
            Err(err) => warn!("Failed to remove extraction workspace {}: {err}", self.path),
        }
    }
}
