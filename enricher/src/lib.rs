//! distmeta enricher library.
//!
//! Post-processes a built static package repository: for every package
//! version whose archive has been built, it publishes a changelog artifact
//! (the version's `changelog.md`, or its diff against the previous version)
//! and a readme snapshot next to the archive, then records their URLs in the
//! version's metadata. It is used by the `distmeta-enricher` binary and can
//! be driven programmatically with injected collaborators.
//!
//! # Modules
//!
//! - [`changelog`] - Changelog artifacts for consecutive versions
//! - [`cli`] - Command-line argument definitions
//! - [`context`] - Collaborators shared by both steps
//! - [`diff`] - Changelog diffing
//! - [`dist_path`] - Archive and artifact naming
//! - [`error`] - Step and runner error types
//! - [`extraction`] - Zip and tar archive extraction
//! - [`filter`] - Archive selection rules
//! - [`fs`] - Filesystem service
//! - [`input`] - Packages document I/O
//! - [`output`] - Log installation and run summary
//! - [`pairs`] - Version pairing for changelog diffs
//! - [`pipeline`] - Step sequencing
//! - [`readme`] - Readme snapshots
//! - [`report`] - Step outcomes
//! - [`skip`] - Idempotency check for repeated builds
//! - [`workspace`] - Ephemeral extraction workspaces

pub mod changelog;
pub mod cli;
pub mod context;
pub mod diff;
pub mod dist_path;
pub mod error;
pub mod extraction;
pub mod filter;
pub mod fs;
pub mod input;
pub mod output;
pub mod pairs;
pub mod pipeline;
pub mod readme;
pub mod report;
pub mod skip;
pub mod workspace;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
