//! Per-step outcomes collected by the orchestrators.

use std::fmt;

use distmeta_common::PackageVersion;

/// What happened to one changelog pair or readme package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// An artifact was written and its URL recorded.
    Published {
        /// Published artifact URL.
        url: String,
    },
    /// The version was already built; the known URL was recorded again
    /// without extracting anything.
    Reused {
        /// Published artifact URL.
        url: String,
    },
    /// No artifact was written but the conventional URL was recorded.
    Predicted {
        /// Predicted artifact URL.
        url: String,
    },
    /// Nothing was produced and no metadata was written.
    Skipped {
        /// Why the step was skipped.
        reason: String,
    },
    /// The step failed; no metadata was written.
    Failed {
        /// Description of the failure.
        reason: String,
    },
}

impl StepOutcome {
    /// The recorded URL, if the step wrote metadata.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Published { url } | Self::Reused { url } | Self::Predicted { url } => Some(url),
            Self::Skipped { .. } | Self::Failed { .. } => None,
        }
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Published { url } => write!(f, "published {url}"),
            Self::Reused { url } => write!(f, "reused {url}"),
            Self::Predicted { url } => write!(f, "predicted {url}"),
            Self::Skipped { reason } => write!(f, "skipped: {reason}"),
            Self::Failed { reason } => write!(f, "failed: {reason}"),
        }
    }
}

/// One entry of an [`EnrichReport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    /// Package name.
    pub package: String,
    /// Pretty version the step acted on.
    pub version: String,
    /// Result of the step.
    pub outcome: StepOutcome,
}

impl StepRecord {
    /// Record `outcome` for `package`.
    #[must_use]
    pub fn new(package: &PackageVersion, outcome: StepOutcome) -> Self {
        Self {
            package: package.name().to_owned(),
            version: package.pretty_version().to_owned(),
            outcome,
        }
    }
}

/// The enriched collection plus what happened along the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichReport {
    /// Package versions in input order, with updated metadata.
    pub packages: Vec<PackageVersion>,
    /// One record per processed pair or package.
    pub records: Vec<StepRecord>,
}

impl EnrichReport {
    /// Number of records written as new artifacts.
    #[must_use]
    pub fn published(&self) -> usize {
        self.count(|outcome| matches!(outcome, StepOutcome::Published { .. }))
    }

    /// Number of records reusing earlier artifacts.
    #[must_use]
    pub fn reused(&self) -> usize {
        self.count(|outcome| matches!(outcome, StepOutcome::Reused { .. }))
    }

    /// Number of records with a predicted URL.
    #[must_use]
    pub fn predicted(&self) -> usize {
        self.count(|outcome| matches!(outcome, StepOutcome::Predicted { .. }))
    }

    /// Number of skipped records.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, StepOutcome::Skipped { .. }))
    }

    /// Number of failed records.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, StepOutcome::Failed { .. }))
    }

    /// Append the records of a later step, taking over its packages.
    pub fn absorb(&mut self, later: Self) {
        self.packages = later.packages;
        self.records.extend(later.records);
    }

    fn count(&self, predicate: impl Fn(&StepOutcome) -> bool) -> usize {
        self.records
            .iter()
            .filter(|record| predicate(&record.outcome))
            .count()
    }
}
