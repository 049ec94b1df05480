//! Version precedence used to order package versions.
//!
//! [`VersionOrder`] is the seam: the enrichment steps only ever compare
//! version strings through it, so alternative strategies or fixed test
//! orderings can be substituted. [`SemverOrder`] is the production order.

use semver::Prerelease;
use std::cmp::Ordering;

/// A total order over version strings.
pub trait VersionOrder {
    /// Compare two version strings.
    fn compare(&self, left: &str, right: &str) -> Ordering;
}

/// Semantic-version precedence, lenient about Composer-style versions.
///
/// Accepts any number of numeric release components (`1.0.0.0`), an optional
/// `v` prefix and a pre-release suffix introduced by `-`. Build metadata after
/// `+` is ignored. Missing release components count as zero, so `1.0` and
/// `1.0.0` compare equal.
///
/// Strings that are not versions at all (such as `dev-main`) sort below every
/// parseable version and lexically among themselves.
///
/// # Examples
///
/// ```
/// use distmeta_common::version::{SemverOrder, VersionOrder};
/// use std::cmp::Ordering;
///
/// let order = SemverOrder;
/// assert_eq!(order.compare("1.0.0-beta", "1.0.0"), Ordering::Less);
/// assert_eq!(order.compare("1.10.0", "1.9.0"), Ordering::Greater);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct SemverOrder;

impl VersionOrder for SemverOrder {
    fn compare(&self, left: &str, right: &str) -> Ordering {
        match (ParsedVersion::parse(left), ParsedVersion::parse(right)) {
            (Some(left_parsed), Some(right_parsed)) => left_parsed.cmp(&right_parsed),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => left.cmp(right),
        }
    }
}

/// A version string broken into release components and pre-release tag.
///
/// Equality follows precedence: `1.0` equals `1.0.0`.
#[derive(Debug, Clone)]
pub struct ParsedVersion {
    release: Vec<u64>,
    pre: Option<Prerelease>,
}

impl ParsedVersion {
    /// Parse a version string, returning `None` when it is not a version.
    ///
    /// # Examples
    ///
    /// ```
    /// use distmeta_common::version::ParsedVersion;
    ///
    /// let parsed = ParsedVersion::parse("v1.2.3.0-RC1").expect("valid version");
    /// assert_eq!(parsed.release(), &[1, 2, 3, 0]);
    /// assert_eq!(parsed.pre_release(), Some("rc1"));
    /// assert!(ParsedVersion::parse("dev-main").is_none());
    /// ```
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        let unprefixed = trimmed
            .strip_prefix(['v', 'V'])
            .unwrap_or(trimmed);
        let core = unprefixed
            .split_once('+')
            .map_or(unprefixed, |(core, _build)| core);
        let (release_part, pre_part) = match core.split_once('-') {
            Some((release, pre)) => (release, Some(pre)),
            None => (core, None),
        };

        let release = release_part
            .split('.')
            .map(|component| component.parse::<u64>().ok())
            .collect::<Option<Vec<_>>>()?;
        let pre = match pre_part {
            None | Some("") => None,
            Some(tag) => Some(Prerelease::new(&normalise_pre_release(tag)).ok()?),
        };

        Some(Self { release, pre })
    }

    /// Numeric release components.
    #[must_use]
    pub fn release(&self) -> &[u64] {
        &self.release
    }

    /// Normalised pre-release tag, if any.
    #[must_use]
    pub fn pre_release(&self) -> Option<&str> {
        self.pre.as_ref().map(Prerelease::as_str)
    }

    /// Whether this is a pre-release.
    #[must_use]
    pub fn is_pre_release(&self) -> bool {
        self.pre.is_some()
    }
}

impl Ord for ParsedVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let width = self.release.len().max(other.release.len());
        let component = |release: &[u64], index: usize| release.get(index).copied().unwrap_or(0);

        (0..width)
            .map(|index| component(&self.release, index).cmp(&component(&other.release, index)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| match (&self.pre, &other.pre) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(left), Some(right)) => left.cmp(right),
            })
    }
}

impl PartialEq for ParsedVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for ParsedVersion {}

impl PartialOrd for ParsedVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Lower-case the tag and turn `-`/`_` separators into semver dots.
fn normalise_pre_release(tag: &str) -> String {
    tag.chars()
        .map(|character| match character {
            '-' | '_' => '.',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}
