//! Selection of the package versions that carry an archive worth enriching.

use std::fmt;

use distmeta::ArchiveConfig;
use distmeta_common::{METAPACKAGE_TYPE, PackageVersion};
use glob::{Pattern, PatternError};

/// Why a version is left out of enrichment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusionReason {
    /// Metapackages have no archive.
    Metapackage,
    /// The version has no distribution URL.
    NoDistUrl,
    /// Development versions are skipped by configuration.
    DevVersion,
    /// The whitelist is non-empty and matches nothing.
    NotWhitelisted,
    /// A blacklist pattern matches the package name.
    Blacklisted(String),
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metapackage => f.write_str("metapackage"),
            Self::NoDistUrl => f.write_str("no distribution URL"),
            Self::DevVersion => f.write_str("development version"),
            Self::NotWhitelisted => f.write_str("not whitelisted"),
            Self::Blacklisted(pattern) => write!(f, "blacklisted by '{pattern}'"),
        }
    }
}

/// Compiled archive selection rules.
#[derive(Debug, Clone, Default)]
pub struct ArchiveFilter {
    skip_dev: bool,
    whitelist: Vec<Pattern>,
    blacklist: Vec<Pattern>,
}

impl ArchiveFilter {
    /// Compile the filter from the `[archive]` configuration block.
    ///
    /// # Errors
    ///
    /// Returns the first invalid glob pattern.
    pub fn from_config(config: &ArchiveConfig) -> Result<Self, PatternError> {
        Ok(Self {
            skip_dev: config.skip_dev,
            whitelist: compile(&config.whitelist)?,
            blacklist: compile(&config.blacklist)?,
        })
    }

    /// The reason `package` is excluded, or `None` when it is enriched.
    #[must_use]
    pub fn excludes(&self, package: &PackageVersion) -> Option<ExclusionReason> {
        if package.package_type() == METAPACKAGE_TYPE {
            return Some(ExclusionReason::Metapackage);
        }
        if package.dist_url().is_none_or(str::is_empty) {
            return Some(ExclusionReason::NoDistUrl);
        }
        if self.skip_dev && package.is_dev() {
            return Some(ExclusionReason::DevVersion);
        }

        let name = package.name();
        if !self.whitelist.is_empty() && !self.whitelist.iter().any(|p| p.matches(name)) {
            return Some(ExclusionReason::NotWhitelisted);
        }
        self.blacklist
            .iter()
            .find(|pattern| pattern.matches(name))
            .map(|pattern| ExclusionReason::Blacklisted(pattern.as_str().to_owned()))
    }
}

fn compile(patterns: &[String]) -> Result<Vec<Pattern>, PatternError> {
    patterns.iter().map(|pattern| Pattern::new(pattern)).collect()
}
