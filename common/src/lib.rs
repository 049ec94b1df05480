//! Package model and version ordering shared by the distmeta tools.
//!
//! - [`package`] - immutable package version values and metadata keys
//! - [`version`] - the injectable version precedence

pub mod package;
pub mod version;

pub use package::{
    DIST_CHANGELOG_URL_KEY, DIST_README_URL_KEY, Dist, METAPACKAGE_TYPE, PackageVersion,
    README_OVERRIDE_KEY,
};
pub use version::{ParsedVersion, SemverOrder, VersionOrder};
