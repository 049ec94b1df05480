//! Runs the enrichment steps in sequence over one package collection.

use log::info;

use crate::changelog::ChangelogExtractor;
use crate::context::EnrichContext;
use crate::diff::DiffEngine;
use crate::readme::ReadmeExtractor;
use crate::report::EnrichReport;
use distmeta_common::PackageVersion;

/// Which steps run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Publish changelog artifacts.
    pub changelog: bool,
    /// Publish readme snapshots.
    pub readme: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            changelog: true,
            readme: true,
        }
    }
}

/// Enrich `packages`, readmes first, then changelogs.
///
/// Each step consumes the collection produced by the one before it. The
/// returned report carries the final collection and the records of every
/// step that ran.
#[must_use]
pub fn enrich(
    context: &EnrichContext<'_>,
    diff: &dyn DiffEngine,
    packages: &[PackageVersion],
    options: PipelineOptions,
) -> EnrichReport {
    let mut report = EnrichReport {
        packages: packages.to_vec(),
        records: Vec::new(),
    };

    // A changelog artifact completes a version's build outputs, so readme
    // selection must see the filesystem before any changelog is written.
    if options.readme {
        let step = ReadmeExtractor::new(context).extract(&report.packages);
        info!(
            "Readmes: {} published, {} reused, {} predicted, {} failed",
            step.published(),
            step.reused(),
            step.predicted(),
            step.failed()
        );
        report.absorb(step);
    }

    if options.changelog {
        let step = ChangelogExtractor::new(context, diff).extract(&report.packages);
        info!(
            "Changelogs: {} published, {} reused, {} skipped, {} failed",
            step.published(),
            step.reused(),
            step.skipped(),
            step.failed()
        );
        report.absorb(step);
    }

    report
}
