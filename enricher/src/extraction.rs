//! Archive extraction for built package distributions.
//!
//! Unpacks `.zip` and `.tar` archives into a workspace directory with path
//! traversal protection to prevent zip-slip attacks.

use camino::Utf8Path;
use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};

/// Trait for extracting package archives, enabling test mocking.
///
/// # Examples
///
/// ```
/// use distmeta_enricher::extraction::DistExtractor;
///
/// let extractor = DistExtractor;
/// // Use extractor.extract(archive_path, dest_dir) in production
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait ArchiveExtractor {
    /// Extract the archive at `archive_path` into `dest_dir`.
    ///
    /// Returns the relative paths of the extracted files.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::MissingArchive`] if the archive does not
    /// exist, [`ExtractionError::PathTraversal`] if any entry attempts to
    /// escape the destination directory, [`ExtractionError::EmptyArchive`]
    /// if no files are found, and [`ExtractionError::Io`] or
    /// [`ExtractionError::Zip`] on read failures.
    fn extract(&self, archive_path: &Utf8Path, dest_dir: &Utf8Path)
    -> Result<Vec<String>, ExtractionError>;
}

/// Errors arising from archive extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// I/O error during extraction.
    #[error("extraction I/O error: {0}")]
    Io(#[from] io::Error),

    /// The zip container is corrupt or uses an unsupported feature.
    #[error("corrupt zip archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The archive file does not exist.
    #[error("archive not found: {path}")]
    MissingArchive {
        /// The archive path that was requested.
        path: String,
    },

    /// The archive extension names no supported format.
    #[error("unsupported archive format: {path}")]
    UnsupportedFormat {
        /// The archive path that was requested.
        path: String,
    },

    /// A path in the archive attempts to traverse outside the destination.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The offending path from the archive entry.
        path: String,
    },

    /// The archive contains no files.
    #[error("archive contains no files")]
    EmptyArchive,
}

/// Default extractor choosing the format from the archive extension.
///
/// `.zip` archives go through [`ZipExtractor`], `.tar` archives through
/// [`TarExtractor`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DistExtractor;

impl ArchiveExtractor for DistExtractor {
    fn extract(
        &self,
        archive_path: &Utf8Path,
        dest_dir: &Utf8Path,
    ) -> Result<Vec<String>, ExtractionError> {
        match archive_path.extension() {
            Some("zip") => ZipExtractor.extract(archive_path, dest_dir),
            Some("tar") => TarExtractor.extract(archive_path, dest_dir),
            _ => Err(ExtractionError::UnsupportedFormat {
                path: archive_path.to_string(),
            }),
        }
    }
}

/// Extractor for zip archives using the `zip` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipExtractor;

impl ArchiveExtractor for ZipExtractor {
    fn extract(
        &self,
        archive_path: &Utf8Path,
        dest_dir: &Utf8Path,
    ) -> Result<Vec<String>, ExtractionError> {
        let file = open_archive(archive_path)?;
        let mut archive = zip::ZipArchive::new(file)?;
        let mut extracted = Vec::new();

        for index in 0..archive.len() {
            let mut entry = archive.by_index(index)?;
            let entry_path = PathBuf::from(entry.name());

            validate_entry_path(&entry_path)?;

            let dest_path = dest_dir.as_std_path().join(&entry_path);
            if entry.is_dir() {
                fs::create_dir_all(&dest_path)?;
                continue;
            }
            if let Some(parent) = dest_path.parent() {
                fs::create_dir_all(parent)?;
            }

            let mut output = File::create(&dest_path)?;
            io::copy(&mut entry, &mut output)?;
            extracted.push(entry_path.to_string_lossy().into_owned());
        }

        if extracted.is_empty() {
            return Err(ExtractionError::EmptyArchive);
        }

        Ok(extracted)
    }
}

/// Extractor for uncompressed tar archives using the `tar` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct TarExtractor;

impl ArchiveExtractor for TarExtractor {
    fn extract(
        &self,
        archive_path: &Utf8Path,
        dest_dir: &Utf8Path,
    ) -> Result<Vec<String>, ExtractionError> {
        let file = open_archive(archive_path)?;
        let mut archive = tar::Archive::new(file);
        let mut extracted = Vec::new();

        for entry_result in archive.entries()? {
            let mut entry = entry_result?;
            let entry_path = entry.path()?.into_owned();

            validate_entry_path(&entry_path)?;

            let dest_path = dest_dir.as_std_path().join(&entry_path);
            if let Some(parent) = dest_path.parent() {
                fs::create_dir_all(parent)?;
            }

            entry.unpack(&dest_path)?;

            if entry.header().entry_type().is_file() {
                extracted.push(entry_path.to_string_lossy().into_owned());
            }
        }

        if extracted.is_empty() {
            return Err(ExtractionError::EmptyArchive);
        }

        Ok(extracted)
    }
}

fn open_archive(archive_path: &Utf8Path) -> Result<File, ExtractionError> {
    File::open(archive_path).map_err(|error| match error.kind() {
        io::ErrorKind::NotFound => ExtractionError::MissingArchive {
            path: archive_path.to_string(),
        },
        _ => ExtractionError::Io(error),
    })
}

/// Validate that an archive entry path does not escape the destination
/// directory via `..` components or absolute paths.
pub(crate) fn validate_entry_path(path: &Path) -> Result<(), ExtractionError> {
    if path.is_absolute() || path.has_root() {
        return Err(ExtractionError::PathTraversal {
            path: path.display().to_string(),
        });
    }
    for component in path.components() {
        if matches!(component, Component::ParentDir | Component::Prefix(_)) {
            return Err(ExtractionError::PathTraversal {
                path: path.display().to_string(),
            });
        }
    }
    Ok(())
}
