//! Changelog diffing.
//!
//! [`DiffEngine`] compares two changelog files and renders the result as raw
//! bytes for the published artifact. [`LineDiffEngine`] is a line diff built
//! on the `similar` crate.

use camino::{Utf8Path, Utf8PathBuf};
use similar::{ChangeTag, TextDiff};

/// A single line of a diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffLine {
    /// Line present in both versions.
    Unchanged(String),
    /// Line only in the newer version.
    Added(String),
    /// Line only in the older version.
    Removed(String),
}

impl DiffLine {
    /// The line content without its trailing newline.
    #[must_use]
    pub fn content(&self) -> &str {
        match self {
            Self::Unchanged(content) | Self::Added(content) | Self::Removed(content) => content,
        }
    }

    /// The marker used in raw output.
    #[must_use]
    pub const fn marker(&self) -> char {
        match self {
            Self::Unchanged(_) => ' ',
            Self::Added(_) => '+',
            Self::Removed(_) => '-',
        }
    }
}

/// The comparison of two changelogs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
    lines: Vec<DiffLine>,
}

impl DiffResult {
    /// Build a result from its lines.
    #[must_use]
    pub fn new(lines: Vec<DiffLine>) -> Self {
        Self { lines }
    }

    /// All lines in order.
    #[must_use]
    pub fn lines(&self) -> &[DiffLine] {
        &self.lines
    }

    /// Whether any line was added or removed.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.lines
            .iter()
            .any(|line| !matches!(line, DiffLine::Unchanged(_)))
    }

    /// Lines introduced by the newer version.
    pub fn added(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().filter_map(|line| match line {
            DiffLine::Added(content) => Some(content.as_str()),
            _ => None,
        })
    }
}

/// Errors raised while diffing changelog files.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// A changelog could not be read.
    #[error("failed to read changelog {path}: {source}")]
    Read {
        /// Path of the unreadable changelog.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Compares changelog files.
#[cfg_attr(test, mockall::automock)]
pub trait DiffEngine {
    /// Compare the changelog at `previous` with the one at `current`.
    ///
    /// # Errors
    ///
    /// Returns [`DiffError::Read`] when either file cannot be read.
    fn compare_files(&self, previous: &Utf8Path, current: &Utf8Path)
    -> Result<DiffResult, DiffError>;

    /// Render a diff as the raw artifact contents.
    fn to_raw(&self, diff: &DiffResult) -> Vec<u8>;
}

/// Line-oriented [`DiffEngine`].
///
/// # Examples
///
/// ```
/// use distmeta_enricher::diff::{DiffEngine, LineDiffEngine, compare_text};
///
/// let diff = compare_text("A\nB\n", "A\nB\nC\n");
/// let raw = LineDiffEngine.to_raw(&diff);
/// assert_eq!(String::from_utf8_lossy(&raw), " A\n B\n+C\n");
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct LineDiffEngine;

impl DiffEngine for LineDiffEngine {
    fn compare_files(
        &self,
        previous: &Utf8Path,
        current: &Utf8Path,
    ) -> Result<DiffResult, DiffError> {
        let previous_text = read_changelog(previous)?;
        let current_text = read_changelog(current)?;
        Ok(compare_text(&previous_text, &current_text))
    }

    fn to_raw(&self, diff: &DiffResult) -> Vec<u8> {
        diff.lines()
            .iter()
            .map(|line| format!("{}{}\n", line.marker(), line.content()))
            .collect::<String>()
            .into_bytes()
    }
}

/// Diff two texts line by line.
#[must_use]
pub fn compare_text(previous: &str, current: &str) -> DiffResult {
    let diff = TextDiff::from_lines(previous, current);
    let lines = diff
        .iter_all_changes()
        .map(|change| {
            let content = change.value().trim_end_matches(['\r', '\n']).to_owned();
            match change.tag() {
                ChangeTag::Equal => DiffLine::Unchanged(content),
                ChangeTag::Insert => DiffLine::Added(content),
                ChangeTag::Delete => DiffLine::Removed(content),
            }
        })
        .collect();
    DiffResult::new(lines)
}

fn read_changelog(path: &Utf8Path) -> Result<String, DiffError> {
    std::fs::read_to_string(path).map_err(|source| DiffError::Read {
        path: path.to_owned(),
        source,
    })
}
