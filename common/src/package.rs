//! Package version model shared by the enrichment steps.
//!
//! A [`PackageVersion`] mirrors one entry of a Composer-style `packages.json`
//! document. Values are immutable: metadata updates go through
//! [`PackageVersion::with_extra`], which hands back a new value and leaves the
//! original untouched. Fields the model does not know about are kept verbatim
//! so a document survives a read/write round-trip.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metadata key holding the published readme URL.
pub const DIST_README_URL_KEY: &str = "distReadmeUrl";

/// Metadata key holding the published changelog URL.
pub const DIST_CHANGELOG_URL_KEY: &str = "distChangelogUrl";

/// Metadata key that overrides the readme location inside an archive.
pub const README_OVERRIDE_KEY: &str = "readme";

/// Package type whose versions never carry an archive.
pub const METAPACKAGE_TYPE: &str = "metapackage";

/// Distribution details of a built archive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dist {
    /// Archive type, also used as the archive file extension (e.g. `zip`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Published URL of the archive.
    pub url: String,
    /// Remaining fields (`reference`, `shasum`, ...) kept for round-trips.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl Dist {
    /// Create distribution details with no additional fields.
    #[must_use]
    pub fn new(kind: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            url: url.into(),
            other: Map::new(),
        }
    }
}

/// One published version of one package.
///
/// # Examples
///
/// ```
/// use distmeta_common::package::{DIST_README_URL_KEY, PackageVersion};
///
/// let package = PackageVersion::new("acme/widgets", "1.2.0")
///     .with_dist("zip", "https://repo.example.org/dist/acme/widgets/acme-widgets-1.2.0.zip");
/// let enriched = package
///     .clone()
///     .with_extra(DIST_README_URL_KEY, "https://repo.example.org/dist/acme/widgets/readme.md");
///
/// assert!(package.extra_str(DIST_README_URL_KEY).is_none());
/// assert_eq!(
///     enriched.extra_str(DIST_README_URL_KEY),
///     Some("https://repo.example.org/dist/acme/widgets/readme.md")
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageVersion {
    name: String,
    #[serde(rename = "version")]
    pretty_version: String,
    #[serde(
        rename = "version_normalized",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    normalized_version: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    package_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dist: Option<Dist>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    extra: Map<String, Value>,
    #[serde(flatten)]
    other: Map<String, Value>,
}

impl PackageVersion {
    /// Create a package version whose normalized and pretty versions agree.
    #[must_use]
    pub fn new(name: impl Into<String>, pretty_version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pretty_version: pretty_version.into(),
            normalized_version: None,
            package_type: None,
            dist: None,
            extra: Map::new(),
            other: Map::new(),
        }
    }

    /// Return a copy carrying an explicit normalized version.
    #[must_use]
    pub fn with_normalized_version(mut self, version: impl Into<String>) -> Self {
        self.normalized_version = Some(version.into());
        self
    }

    /// Return a copy carrying the given package type.
    #[must_use]
    pub fn with_package_type(mut self, package_type: impl Into<String>) -> Self {
        self.package_type = Some(package_type.into());
        self
    }

    /// Return a copy carrying distribution details.
    #[must_use]
    pub fn with_dist(mut self, kind: impl Into<String>, url: impl Into<String>) -> Self {
        self.dist = Some(Dist::new(kind, url));
        self
    }

    /// Return a copy whose metadata has `key` set to `value`.
    ///
    /// Any existing value under `key` is replaced; all other keys are kept.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Package name, e.g. `acme/widgets`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Version used for ordering: the normalized version when present,
    /// otherwise the pretty version.
    #[must_use]
    pub fn version(&self) -> &str {
        self.normalized_version
            .as_deref()
            .unwrap_or(&self.pretty_version)
    }

    /// Display version, used in archive and artifact filenames.
    #[must_use]
    pub fn pretty_version(&self) -> &str {
        &self.pretty_version
    }

    /// Package type, defaulting to `library` as Composer does.
    #[must_use]
    pub fn package_type(&self) -> &str {
        self.package_type.as_deref().unwrap_or("library")
    }

    /// Distribution details, if the version has a built archive.
    #[must_use]
    pub fn dist(&self) -> Option<&Dist> {
        self.dist.as_ref()
    }

    /// Published archive URL.
    #[must_use]
    pub fn dist_url(&self) -> Option<&str> {
        self.dist.as_ref().map(|dist| dist.url.as_str())
    }

    /// Archive type (and file extension).
    #[must_use]
    pub fn dist_type(&self) -> Option<&str> {
        self.dist.as_ref().map(|dist| dist.kind.as_str())
    }

    /// Metadata mapping.
    #[must_use]
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Metadata value under `key` when it is a string.
    #[must_use]
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }

    /// Whether this is a development version (`dev-main`, `1.x-dev`).
    #[must_use]
    pub fn is_dev(&self) -> bool {
        let version = self.pretty_version.as_str();
        version.starts_with("dev-") || version.ends_with("-dev")
    }
}
