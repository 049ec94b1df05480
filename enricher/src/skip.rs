//! Idempotency check for repeated builds.

use log::debug;

use crate::dist_path::DistPathResolver;
use crate::fs::Filesystem;
use distmeta_common::PackageVersion;

/// Decides whether a package version was fully processed by an earlier run.
pub struct SkipOracle<'a> {
    resolver: &'a DistPathResolver,
    fs: &'a dyn Filesystem,
}

impl<'a> SkipOracle<'a> {
    /// Create an oracle probing paths from `resolver` through `fs`.
    #[must_use]
    pub fn new(resolver: &'a DistPathResolver, fs: &'a dyn Filesystem) -> Self {
        Self { resolver, fs }
    }

    /// True when the primary archive, the sibling `readme.md` and the sibling
    /// changelog artifact all exist.
    ///
    /// A path whose existence cannot be determined counts as absent.
    #[must_use]
    pub fn is_skippable(&self, package: &PackageVersion) -> bool {
        let required = [
            self.resolver.archive_path(package),
            self.resolver.readme_path(package),
            self.resolver.changelog_path(package),
        ];
        required.iter().all(|path| match self.fs.exists(path) {
            Ok(present) => present,
            Err(err) => {
                debug!("Treating {path} as absent: {err}");
                false
            }
        })
    }
}
