//! Shared test utilities for the enricher crate.

use camino::{Utf8Path, Utf8PathBuf};
use std::cell::RefCell;
use std::collections::HashMap;

use crate::context::EnrichContext;
use crate::dist_path::DistPathResolver;
use crate::extraction::{ArchiveExtractor, ExtractionError};
use crate::filter::ArchiveFilter;
use crate::fs::Filesystem;
use crate::workspace::{IdGenerator, WorkspaceFactory};
use distmeta_common::{PackageVersion, SemverOrder};

/// Base URL of the fixture repository.
pub const DIST_BASE_URL: &str = "https://repo.example.org/dist";

/// Creates a zip-distributed package version published under
/// [`DIST_BASE_URL`] following the archive naming scheme.
pub fn package_version(name: &str, version: &str) -> PackageVersion {
    PackageVersion::new(name, version).with_dist("zip", dist_url(name, version))
}

/// Published archive URL of a fixture package version.
pub fn dist_url(name: &str, version: &str) -> String {
    let flattened = name.replace('/', "-");
    format!("{DIST_BASE_URL}/{name}/{flattened}-{version}.zip")
}

/// Published URL of `filename` in a fixture package's directory.
pub fn artifact_url(name: &str, filename: &str) -> String {
    format!("{DIST_BASE_URL}/{name}/{filename}")
}

/// An [`ArchiveExtractor`] serving registered in-memory archives.
///
/// Every call is recorded, whether or not the archive is known. Unknown
/// archives fail with [`ExtractionError::MissingArchive`].
#[derive(Debug, Default)]
pub struct RecordingExtractor {
    archives: RefCell<HashMap<Utf8PathBuf, Vec<(String, String)>>>,
    calls: RefCell<Vec<Utf8PathBuf>>,
}

impl RecordingExtractor {
    /// Creates an extractor with no archives.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the files of the archive at `path`.
    pub fn add_archive(&self, path: impl Into<Utf8PathBuf>, files: &[(&str, &str)]) {
        let entries = files
            .iter()
            .map(|(name, contents)| ((*name).to_owned(), (*contents).to_owned()))
            .collect();
        self.archives.borrow_mut().insert(path.into(), entries);
    }

    /// Archives extracted so far, in call order.
    pub fn extractions(&self) -> Vec<Utf8PathBuf> {
        self.calls.borrow().clone()
    }

    /// Number of extractions performed so far.
    pub fn extraction_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl ArchiveExtractor for RecordingExtractor {
    fn extract(
        &self,
        archive_path: &Utf8Path,
        dest_dir: &Utf8Path,
    ) -> Result<Vec<String>, ExtractionError> {
        self.calls.borrow_mut().push(archive_path.to_owned());
        let archives = self.archives.borrow();
        let files = archives
            .get(archive_path)
            .ok_or_else(|| ExtractionError::MissingArchive {
                path: archive_path.to_string(),
            })?;

        for (name, contents) in files {
            let target = dest_dir.join(name);
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&target, contents)?;
        }
        Ok(files.iter().map(|(name, _)| name.clone()).collect())
    }
}

/// A temporary output root and workspace root.
///
/// Both directories are removed when the sandbox is dropped.
#[derive(Debug)]
pub struct Sandbox {
    _temp: tempfile::TempDir,
    output_root: Utf8PathBuf,
    workspace_root: Utf8PathBuf,
}

impl Sandbox {
    /// Creates a fresh sandbox.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created or is not UTF-8.
    pub fn new() -> Self {
        let temp = tempfile::tempdir().expect("create sandbox");
        let root = Utf8PathBuf::try_from(temp.path().to_path_buf()).expect("UTF-8 sandbox path");
        let output_root = root.join("out");
        let workspace_root = root.join("work");
        std::fs::create_dir_all(&output_root).expect("create output root");
        std::fs::create_dir_all(&workspace_root).expect("create workspace root");
        Self {
            _temp: temp,
            output_root,
            workspace_root,
        }
    }

    /// Directory archives and artifacts are published under.
    pub fn output_root(&self) -> &Utf8Path {
        &self.output_root
    }

    /// Directory extraction workspaces are created under.
    pub fn workspace_root(&self) -> &Utf8Path {
        &self.workspace_root
    }

    /// Resolver rooted at the sandbox output root.
    pub fn resolver(&self) -> DistPathResolver {
        DistPathResolver::new(&self.output_root, None)
    }

    /// Builds a context over the sandbox with semantic version ordering and
    /// the default archive filter.
    pub fn context<'a>(
        &self,
        ids: &'a dyn IdGenerator,
        fs: &'a dyn Filesystem,
        extractor: &'a dyn ArchiveExtractor,
    ) -> EnrichContext<'a> {
        EnrichContext {
            resolver: self.resolver(),
            workspaces: WorkspaceFactory::new(self.workspace_root.clone(), ids, fs, extractor),
            fs,
            order: &SemverOrder,
            filter: ArchiveFilter::default(),
        }
    }

    /// Writes the archive, readme and changelog artifact of `package` so it
    /// counts as fully built.
    ///
    /// # Panics
    ///
    /// Panics if a file cannot be written.
    pub fn mark_built(&self, package: &PackageVersion) {
        let resolver = self.resolver();
        for path in [
            resolver.archive_path(package),
            resolver.readme_path(package),
            resolver.changelog_path(package),
        ] {
            if !path.exists() {
                write_file(&path, "");
            }
        }
    }

    /// Names of the entries left in the workspace root.
    ///
    /// # Panics
    ///
    /// Panics if the workspace root cannot be listed.
    pub fn leftover_workspaces(&self) -> Vec<String> {
        std::fs::read_dir(&self.workspace_root)
            .expect("list workspace root")
            .map(|entry| {
                entry
                    .expect("read workspace entry")
                    .file_name()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect()
    }
}

impl Default for Sandbox {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes `contents` to `path`, creating parent directories.
///
/// # Panics
///
/// Panics if the file cannot be written.
pub fn write_file(path: &Utf8Path, contents: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent directory");
    }
    std::fs::write(path, contents).expect("write file");
}

/// Reads `path` as UTF-8 text.
///
/// # Panics
///
/// Panics if the file cannot be read.
pub fn read_file(path: &Utf8Path) -> String {
    std::fs::read_to_string(path).expect("read file")
}
