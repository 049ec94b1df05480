//! CLI argument definitions for the enricher.
//!
//! Kept apart from the entrypoint so argument parsing can be tested without
//! running the pipeline.

use camino::Utf8PathBuf;
use clap::Parser;

use crate::pipeline::PipelineOptions;

/// Derive changelog and readme artifacts for built package archives.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "distmeta-enricher")]
#[command(version, about)]
#[command(long_about = concat!(
    "Derive changelog and readme artifacts for built package archives.\n\n",
    "Reads a JSON array of package versions, unpacks each version's archive ",
    "from the output directory, publishes changelog-{version}.md and readme.md ",
    "next to the archive, and records their URLs under distChangelogUrl and ",
    "distReadmeUrl. Versions built by an earlier run are not unpacked again.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Enrich packages in place:\n",
    "    $ distmeta-enricher build/packages.json build\n\n",
    "  Write the result elsewhere and only publish readmes:\n",
    "    $ distmeta-enricher --skip-changelog -o enriched.json packages.json build\n",
))]
pub struct Cli {
    /// JSON array of package versions to enrich.
    pub packages: Utf8PathBuf,

    /// Directory the package archives were built into.
    pub output_dir: Utf8PathBuf,

    /// Configuration file (defaults to distmeta.toml in the current directory).
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Write the enriched packages here instead of overwriting the input.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<Utf8PathBuf>,

    /// Do not publish readme snapshots.
    #[arg(long)]
    pub skip_readme: bool,

    /// Do not publish changelog artifacts.
    #[arg(long)]
    pub skip_changelog: bool,

    /// Increase log verbosity (repeatable: -v, -vv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Only log warnings and errors.
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}

impl Cli {
    /// Steps selected by the skip flags.
    #[must_use]
    pub const fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            changelog: !self.skip_changelog,
            readme: !self.skip_readme,
        }
    }

    /// Where the enriched packages are written.
    #[must_use]
    pub fn output_path(&self) -> &Utf8PathBuf {
        self.output.as_ref().unwrap_or(&self.packages)
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
