//! Readme snapshots for each package.
//!
//! One version is selected per package: the greatest version that still
//! needs building, or the greatest fully built one when nothing does. Built
//! versions reuse the published readme URL without extracting; otherwise the
//! archive is unpacked and its readme (the `readme` metadata key, defaulting
//! to `readme.md`) is copied next to the archive.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;

use log::{debug, info, warn};

use crate::context::EnrichContext;
use crate::dist_path::{README_FILENAME, published_url};
use crate::error::{EnrichError, Result};
use crate::extraction::validate_entry_path;
use crate::report::{EnrichReport, StepOutcome, StepRecord};
use distmeta_common::{DIST_README_URL_KEY, PackageVersion, README_OVERRIDE_KEY};

/// Workspace name prefix for readme extractions.
pub const README_WORKSPACE_PREFIX: &str = "readme_extractor";

/// The version chosen to provide a package's readme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadmeSelection {
    /// Index of the version in the input collection.
    pub position: usize,
    /// Whether the version is already fully built.
    pub built: bool,
}

#[derive(Default)]
struct Candidates {
    pending: Option<usize>,
    built: Option<usize>,
}

/// Publishes readme snapshots for a package collection.
pub struct ReadmeExtractor<'a> {
    context: &'a EnrichContext<'a>,
}

impl<'a> ReadmeExtractor<'a> {
    /// Create an extractor over `context`.
    #[must_use]
    pub fn new(context: &'a EnrichContext<'a>) -> Self {
        Self { context }
    }

    /// Publish a readme for every package in `packages`.
    ///
    /// Only the selected version of each package receives `distReadmeUrl`;
    /// the report keeps the collection in input order.
    #[must_use]
    pub fn extract(&self, packages: &[PackageVersion]) -> EnrichReport {
        info!("Extracting README.md from packages");

        let mut enriched = packages.to_vec();
        let mut records = Vec::new();
        for selection in self.resolve_versions(packages) {
            let Some(package) = packages.get(selection.position) else {
                continue;
            };
            let outcome = self.run_package(package, selection.built);
            if let (Some(url), Some(slot)) = (outcome.url(), enriched.get_mut(selection.position)) {
                let updated = slot.clone().with_extra(DIST_README_URL_KEY, url);
                *slot = updated;
            }
            records.push(StepRecord::new(package, outcome));
        }

        EnrichReport {
            packages: enriched,
            records,
        }
    }

    /// Select one version per package, in first-seen package order.
    ///
    /// A later version replaces the kept one only when it compares strictly
    /// greater, so equal versions keep the first occurrence.
    #[must_use]
    pub fn resolve_versions(&self, packages: &[PackageVersion]) -> Vec<ReadmeSelection> {
        let oracle = self.context.skip_oracle();
        let mut names: Vec<&str> = Vec::new();
        let mut candidates: HashMap<&str, Candidates> = HashMap::new();

        for (position, package) in packages.iter().enumerate() {
            if self.context.is_excluded(package) {
                continue;
            }
            let entry = candidates.entry(package.name()).or_insert_with(|| {
                names.push(package.name());
                Candidates::default()
            });
            let slot = if oracle.is_skippable(package) {
                &mut entry.built
            } else {
                &mut entry.pending
            };
            let replace = slot
                .and_then(|kept| packages.get(kept))
                .is_none_or(|kept| self.is_greater(package, kept));
            if replace {
                *slot = Some(position);
            }
        }

        names
            .into_iter()
            .filter_map(|name| {
                let entry = candidates.get(name)?;
                match (entry.pending, entry.built) {
                    (Some(position), _) => Some(ReadmeSelection {
                        position,
                        built: false,
                    }),
                    (None, Some(position)) => Some(ReadmeSelection {
                        position,
                        built: true,
                    }),
                    (None, None) => None,
                }
            })
            .collect()
    }

    fn is_greater(&self, candidate: &PackageVersion, kept: &PackageVersion) -> bool {
        self.context.order.compare(candidate.version(), kept.version()) == Ordering::Greater
    }

    fn run_package(&self, package: &PackageVersion, built: bool) -> StepOutcome {
        let Some(dist_url) = package.dist_url() else {
            let err = EnrichError::MissingDistUrl {
                package: package.name().to_owned(),
                version: package.pretty_version().to_owned(),
            };
            return StepOutcome::Skipped {
                reason: err.to_string(),
            };
        };
        let url = published_url(dist_url, README_FILENAME);

        if built {
            debug!(
                "Readme for {} {} already built, reusing {url}",
                package.name(),
                package.pretty_version()
            );
            return StepOutcome::Reused { url };
        }

        match self.copy_readme(package) {
            Ok(true) => StepOutcome::Published { url },
            Ok(false) => StepOutcome::Predicted { url },
            Err(err) => {
                warn!(
                    "Readme for {} {} failed: {err}",
                    package.name(),
                    package.pretty_version()
                );
                StepOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }

    /// Copy the package readme next to its archive. Returns whether a readme
    /// was found.
    fn copy_readme(&self, package: &PackageVersion) -> Result<bool> {
        let resolver = &self.context.resolver;
        info!(
            "Extracting README.md from package '{}' with highest version '{}'",
            package.name(),
            package.pretty_version()
        );
        let workspace = self
            .context
            .workspaces
            .extract(README_WORKSPACE_PREFIX, &resolver.archive_path(package))?;

        let source_name = readme_source(package);
        match workspace.locate(source_name) {
            Ok(source) => {
                self.context
                    .fs
                    .copy(&source, &resolver.readme_path(package))?;
                Ok(true)
            }
            Err(err) if err.is_skip() => {
                warn!(
                    "No readme in {} {}: {err}",
                    package.name(),
                    package.pretty_version()
                );
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }
}

/// Readme location inside the archive of `package`.
///
/// Overrides that would escape the archive root fall back to `readme.md`.
fn readme_source(package: &PackageVersion) -> &str {
    match package.extra_str(README_OVERRIDE_KEY) {
        Some(path) if !path.is_empty() && validate_entry_path(Path::new(path)).is_ok() => path,
        Some(path) => {
            warn!(
                "Ignoring readme override '{path}' for {}; using {README_FILENAME}",
                package.name()
            );
            README_FILENAME
        }
        None => README_FILENAME,
    }
}

#[cfg(test)]
#[path = "readme_tests.rs"]
mod tests;
