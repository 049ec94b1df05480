//! Error types for the enrichment steps and the command-line runner.

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::diff::DiffError;
use crate::extraction::ExtractionError;
use crate::fs::FsError;

/// Failure of one changelog pair or readme package step.
///
/// None of these abort a batch; the orchestrators turn them into report
/// entries.
#[derive(Debug, Error)]
pub enum EnrichError {
    /// An archive could not be unpacked.
    #[error("failed to extract {archive}: {source}")]
    Extraction {
        /// Archive that was being unpacked.
        archive: Utf8PathBuf,
        /// Underlying extraction error.
        #[source]
        source: ExtractionError,
    },

    /// A filesystem operation failed.
    #[error(transparent)]
    Fs(#[from] FsError),

    /// The changelog diff could not be computed.
    #[error(transparent)]
    Diff(#[from] DiffError),

    /// An expected source file is absent from the extracted archive.
    #[error("{file} not found in {workspace}")]
    MissingSourceFile {
        /// File name looked up relative to the workspace root.
        file: String,
        /// Workspace that was searched.
        workspace: Utf8PathBuf,
    },

    /// The version has no distribution URL to publish next to.
    #[error("{package} {version} has no distribution URL")]
    MissingDistUrl {
        /// Package name.
        package: String,
        /// Pretty version.
        version: String,
    },
}

impl EnrichError {
    /// Whether this error marks a skipped step rather than a failure.
    #[must_use]
    pub const fn is_skip(&self) -> bool {
        matches!(self, Self::MissingSourceFile { .. })
    }
}

/// Result alias for enrichment steps.
pub type Result<T> = std::result::Result<T, EnrichError>;

/// Fatal errors of the command-line runner.
#[derive(Debug, Error)]
pub enum RunError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] distmeta::ConfigError),

    /// An archive filter pattern is not a valid glob.
    #[error("invalid archive filter pattern: {0}")]
    Filter(#[from] glob::PatternError),

    /// The packages document could not be read.
    #[error("failed to read packages from {path}: {source}")]
    ReadPackages {
        /// Path of the packages document.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The packages document is not a JSON array of package versions.
    #[error("failed to parse packages from {path}: {source}")]
    ParsePackages {
        /// Path of the packages document.
        path: Utf8PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The enriched packages document could not be written.
    #[error("failed to write packages to {path}: {source}")]
    WritePackages {
        /// Destination path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The system temporary directory is not valid UTF-8.
    #[error("temporary directory {0} is not valid UTF-8")]
    NonUtf8TempDir(String),
}
