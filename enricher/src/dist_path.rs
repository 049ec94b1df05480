//! Naming scheme for primary archives and their derived artifacts.
//!
//! Every derived artifact sits next to the primary archive of its version.
//! The archive lives at
//! `{base}/{name}/{name with '/' replaced by '-'}-{version}.{dist_type}`
//! where `base` is the configured override or the output root.

use camino::{Utf8Path, Utf8PathBuf};
use distmeta_common::PackageVersion;

/// Filename of the readme snapshot in an artifact directory.
pub const README_FILENAME: &str = "readme.md";

/// Changelog filename expected at the root of every archive.
pub const CHANGELOG_SOURCE: &str = "changelog.md";

/// Archive type assumed when a version's dist block omits it.
pub const DEFAULT_DIST_TYPE: &str = "zip";

/// Resolves archive and artifact paths for package versions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistPathResolver {
    base_dir: Utf8PathBuf,
}

impl DistPathResolver {
    /// Create a resolver rooted at `base_dir_override` when given, otherwise
    /// at `output_root`.
    #[must_use]
    pub fn new(output_root: &Utf8Path, base_dir_override: Option<Utf8PathBuf>) -> Self {
        Self {
            base_dir: base_dir_override.unwrap_or_else(|| output_root.to_owned()),
        }
    }

    /// Archive path for an explicit package identity.
    #[must_use]
    pub fn resolve(&self, name: &str, version: &str, dist_type: &str) -> Utf8PathBuf {
        let flattened = name.replace(['/', '\\'], "-");
        self.base_dir
            .join(name)
            .join(format!("{flattened}-{version}.{dist_type}"))
    }

    /// Archive path of `package`, named after its pretty version.
    #[must_use]
    pub fn archive_path(&self, package: &PackageVersion) -> Utf8PathBuf {
        self.resolve(
            package.name(),
            package.pretty_version(),
            package.dist_type().unwrap_or(DEFAULT_DIST_TYPE),
        )
    }

    /// Directory holding the archive and derived artifacts of `package`.
    #[must_use]
    pub fn artifact_dir(&self, package: &PackageVersion) -> Utf8PathBuf {
        let archive = self.archive_path(package);
        archive
            .parent()
            .map_or_else(|| self.base_dir.clone(), Utf8Path::to_owned)
    }

    /// Target of the readme snapshot for `package`.
    #[must_use]
    pub fn readme_path(&self, package: &PackageVersion) -> Utf8PathBuf {
        self.artifact_dir(package).join(README_FILENAME)
    }

    /// Target of the changelog artifact for `package`.
    #[must_use]
    pub fn changelog_path(&self, package: &PackageVersion) -> Utf8PathBuf {
        self.artifact_dir(package)
            .join(changelog_filename(package.pretty_version()))
    }
}

/// Archive path for one package version.
///
/// # Examples
///
/// ```
/// use camino::{Utf8Path, Utf8PathBuf};
/// use distmeta_enricher::dist_path::resolve_dist_path;
///
/// let path = resolve_dist_path(
///     "vendor/pkg",
///     "1.0.0",
///     Utf8Path::new("/out"),
///     Some(Utf8PathBuf::from("/out/dist")),
///     "zip",
/// );
/// assert_eq!(path, "/out/dist/vendor/pkg/vendor-pkg-1.0.0.zip");
/// ```
#[must_use]
pub fn resolve_dist_path(
    name: &str,
    version: &str,
    output_root: &Utf8Path,
    base_dir_override: Option<Utf8PathBuf>,
    dist_type: &str,
) -> Utf8PathBuf {
    DistPathResolver::new(output_root, base_dir_override).resolve(name, version, dist_type)
}

/// Changelog artifact filename for a pretty version.
#[must_use]
pub fn changelog_filename(pretty_version: &str) -> String {
    format!("changelog-{pretty_version}.md")
}

/// URL of `filename` published next to the archive at `dist_url`.
///
/// A URL without any `/` resolves against the current directory (`.`).
#[must_use]
pub fn published_url(dist_url: &str, filename: &str) -> String {
    let directory = dist_url
        .rsplit_once('/')
        .map_or(".", |(directory, _archive)| directory);
    format!("{directory}/{filename}")
}
