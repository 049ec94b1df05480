//! Changelog artifacts for consecutive package versions.
//!
//! For every [`VersionPair`] the current archive (and the previous one, when
//! there is one) is unpacked into its own workspace. The oldest version of a
//! package publishes its `changelog.md` verbatim; every later version
//! publishes the diff against its predecessor. The artifact is written next
//! to the current archive as `changelog-{pretty version}.md` and its URL is
//! recorded under `distChangelogUrl`.
//!
//! A pair whose changelog source is missing is skipped. Extraction, diff and
//! filesystem failures are recorded against the pair and the batch carries
//! on.

use log::{debug, info, warn};

use crate::context::EnrichContext;
use crate::diff::DiffEngine;
use crate::dist_path::{CHANGELOG_SOURCE, changelog_filename, published_url};
use crate::error::{EnrichError, Result};
use crate::pairs::{VersionPair, VersionPairBuilder};
use crate::report::{EnrichReport, StepOutcome, StepRecord};
use crate::skip::SkipOracle;
use distmeta_common::{DIST_CHANGELOG_URL_KEY, PackageVersion};

/// Workspace name prefix for changelog extractions.
pub const CHANGELOG_WORKSPACE_PREFIX: &str = "changelog_extractor";

/// Publishes changelog artifacts for a package collection.
pub struct ChangelogExtractor<'a> {
    context: &'a EnrichContext<'a>,
    diff: &'a dyn DiffEngine,
}

impl<'a> ChangelogExtractor<'a> {
    /// Create an extractor diffing changelogs with `diff`.
    #[must_use]
    pub fn new(context: &'a EnrichContext<'a>, diff: &'a dyn DiffEngine) -> Self {
        Self { context, diff }
    }

    /// Publish changelogs for every version in `packages`.
    ///
    /// The returned report holds the collection in input order with
    /// `distChangelogUrl` recorded on each version that produced (or already
    /// had) an artifact, and one record per processed pair.
    #[must_use]
    pub fn extract(&self, packages: &[PackageVersion]) -> EnrichReport {
        let candidates = packages
            .iter()
            .enumerate()
            .filter(|(_, package)| !self.context.is_excluded(package));
        let pairs = VersionPairBuilder::new(self.context.order).build_indexed(candidates);
        let oracle = self.context.skip_oracle();

        let mut enriched = packages.to_vec();
        let mut records = Vec::with_capacity(pairs.len());
        for pair in &pairs {
            let outcome = self.process_pair(pair, &oracle);
            if let (Some(url), Some(slot)) = (outcome.url(), enriched.get_mut(pair.position)) {
                let updated = slot.clone().with_extra(DIST_CHANGELOG_URL_KEY, url);
                *slot = updated;
            }
            records.push(StepRecord::new(pair.current, outcome));
        }

        EnrichReport {
            packages: enriched,
            records,
        }
    }

    fn process_pair(&self, pair: &VersionPair<'_>, oracle: &SkipOracle<'_>) -> StepOutcome {
        let current = pair.current;
        let Some(dist_url) = current.dist_url() else {
            let err = EnrichError::MissingDistUrl {
                package: current.name().to_owned(),
                version: current.pretty_version().to_owned(),
            };
            return StepOutcome::Skipped {
                reason: err.to_string(),
            };
        };
        let url = published_url(dist_url, &changelog_filename(current.pretty_version()));

        if oracle.is_skippable(current) {
            debug!(
                "Changelog for {} {} already built, reusing {url}",
                current.name(),
                current.pretty_version()
            );
            return StepOutcome::Reused { url };
        }

        match self.write_artifact(pair) {
            Ok(()) => StepOutcome::Published { url },
            Err(err) if err.is_skip() => {
                debug!(
                    "No changelog for {} {}: {err}",
                    current.name(),
                    current.pretty_version()
                );
                StepOutcome::Skipped {
                    reason: err.to_string(),
                }
            }
            Err(err) => {
                warn!(
                    "Changelog for {} {} failed: {err}",
                    current.name(),
                    current.pretty_version()
                );
                StepOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }

    fn write_artifact(&self, pair: &VersionPair<'_>) -> Result<()> {
        let resolver = &self.context.resolver;
        let workspaces = &self.context.workspaces;
        let current = pair.current;
        let target = resolver.changelog_path(current);

        info!(
            "Extracting changelog from package '{}' version '{}'",
            current.name(),
            current.pretty_version()
        );
        let current_workspace =
            workspaces.extract(CHANGELOG_WORKSPACE_PREFIX, &resolver.archive_path(current))?;
        let previous_workspace = pair
            .previous
            .map(|previous| {
                workspaces.extract(CHANGELOG_WORKSPACE_PREFIX, &resolver.archive_path(previous))
            })
            .transpose()?;

        let current_changelog = current_workspace.locate(CHANGELOG_SOURCE)?;
        match previous_workspace {
            None => self.context.fs.copy(&current_changelog, &target)?,
            Some(previous_workspace) => {
                let previous_changelog = previous_workspace.locate(CHANGELOG_SOURCE)?;
                let diff = self
                    .diff
                    .compare_files(&previous_changelog, &current_changelog)?;
                self.context.fs.write(&target, &self.diff.to_raw(&diff))?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "changelog_tests.rs"]
mod tests;
