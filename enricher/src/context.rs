//! Collaborators shared by both enrichment steps.

use distmeta_common::{PackageVersion, VersionOrder};
use log::debug;

use crate::dist_path::DistPathResolver;
use crate::filter::ArchiveFilter;
use crate::fs::Filesystem;
use crate::skip::SkipOracle;
use crate::workspace::WorkspaceFactory;

/// Everything an orchestrator needs besides its own step-specific engine.
pub struct EnrichContext<'a> {
    /// Archive and artifact naming.
    pub resolver: DistPathResolver,
    /// Extraction workspace source.
    pub workspaces: WorkspaceFactory<'a>,
    /// Artifact writes and existence probes.
    pub fs: &'a dyn Filesystem,
    /// Version precedence used for pairing and readme selection.
    pub order: &'a dyn VersionOrder,
    /// Versions left out of enrichment.
    pub filter: ArchiveFilter,
}

impl EnrichContext<'_> {
    /// Idempotency oracle over this context's paths.
    #[must_use]
    pub fn skip_oracle(&self) -> SkipOracle<'_> {
        SkipOracle::new(&self.resolver, self.fs)
    }

    /// Whether `package` is left out of enrichment, logging why.
    #[must_use]
    pub fn is_excluded(&self, package: &PackageVersion) -> bool {
        match self.filter.excludes(package) {
            Some(reason) => {
                debug!(
                    "Leaving {} {} alone: {reason}",
                    package.name(),
                    package.pretty_version()
                );
                true
            }
            None => false,
        }
    }
}
