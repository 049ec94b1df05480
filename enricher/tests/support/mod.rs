//! Test support utilities for enricher behavioural and end-to-end tests.
//!
//! Builds real zip archives at the paths the resolver expects and counts
//! extractions performed through the production extractor.

use camino::{Utf8Path, Utf8PathBuf};
use distmeta_common::PackageVersion;
use distmeta_enricher::extraction::{ArchiveExtractor, DistExtractor, ExtractionError};
use distmeta_enricher::test_utils::{Sandbox, package_version};
use std::cell::{Cell, RefCell};
use std::fs::File;
use std::io::Write;
use zip::write::SimpleFileOptions;

/// Writes a zip archive at `path` holding `files`.
pub fn write_zip(path: &Utf8Path, files: &[(&str, &str)]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create archive directory");
    }
    let file = File::create(path).expect("create archive");
    let mut writer = zip::ZipWriter::new(file);
    for (name, contents) in files {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .expect("start entry");
        writer.write_all(contents.as_bytes()).expect("write entry");
    }
    writer.finish().expect("finish archive");
}

/// Builds the archive of `name` `version` in the sandbox output root and
/// returns the matching package version.
pub fn build_release(
    sandbox: &Sandbox,
    name: &str,
    version: &str,
    files: &[(&str, &str)],
) -> PackageVersion {
    let package = package_version(name, version);
    write_zip(&sandbox.resolver().archive_path(&package), files);
    package
}

/// The production extractor, counting how often it runs.
#[derive(Debug, Default)]
pub struct CountingExtractor {
    calls: Cell<usize>,
    archives: RefCell<Vec<Utf8PathBuf>>,
}

impl CountingExtractor {
    /// Number of extractions so far.
    pub fn count(&self) -> usize {
        self.calls.get()
    }

    /// Archives extracted so far, in call order.
    pub fn archives(&self) -> Vec<Utf8PathBuf> {
        self.archives.borrow().clone()
    }
}

impl ArchiveExtractor for CountingExtractor {
    fn extract(
        &self,
        archive_path: &Utf8Path,
        dest_dir: &Utf8Path,
    ) -> Result<Vec<String>, ExtractionError> {
        self.calls.set(self.calls.get() + 1);
        self.archives.borrow_mut().push(archive_path.to_owned());
        DistExtractor.extract(archive_path, dest_dir)
    }
}
