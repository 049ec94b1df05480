//! Terminal output: log installation and the run summary.
//!
//! The library logs through the `log` facade. The binary routes those
//! records to stderr through a `tracing-subscriber` formatter.

use std::io::Write;

use tracing_subscriber::filter::LevelFilter;

use crate::report::EnrichReport;

/// Write a line to `stderr`, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort output; ignore write failures.
    }
}

/// Log level selected by the `-v` count and the `-q` flag.
#[must_use]
pub const fn level_for(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::WARN;
    }
    match verbosity {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Install the stderr log formatter at the level chosen by the flags.
///
/// `log` records are bridged into the subscriber. A second call leaves the
/// first installation in place.
pub fn init_logging(verbosity: u8, quiet: bool) {
    let installed = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level_for(verbosity, quiet))
        .with_target(false)
        .without_time()
        .try_init();
    if installed.is_err() {
        // Already installed.
    }
}

/// One-line summary of a finished run.
#[must_use]
pub fn summary_message(report: &EnrichReport) -> String {
    format!(
        "Enriched {} package version(s): {} published, {} reused, {} predicted, {} skipped, {} failed",
        report.packages.len(),
        report.published(),
        report.reused(),
        report.predicted(),
        report.skipped(),
        report.failed()
    )
}
