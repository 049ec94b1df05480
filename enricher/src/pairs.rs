//! Consecutive version pairs for changelog diffing.
//!
//! Versions are grouped by package name in first-seen order, each group is
//! stable-sorted ascending by the injected [`VersionOrder`], and every
//! version is paired with its predecessor. The oldest version of a package
//! has no predecessor.

use std::collections::HashMap;

use distmeta_common::{PackageVersion, VersionOrder};

/// A version together with the version it is diffed against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VersionPair<'a> {
    /// Index of `current` in the collection handed to the builder.
    pub position: usize,
    /// The newer version.
    pub current: &'a PackageVersion,
    /// The next-older version of the same package, if any.
    pub previous: Option<&'a PackageVersion>,
}

/// Builds [`VersionPair`]s from a package collection.
pub struct VersionPairBuilder<'a> {
    order: &'a dyn VersionOrder,
}

impl<'a> VersionPairBuilder<'a> {
    /// Create a builder ordering versions with `order`.
    #[must_use]
    pub fn new(order: &'a dyn VersionOrder) -> Self {
        Self { order }
    }

    /// Pair every version in `versions` with its predecessor.
    ///
    /// # Examples
    ///
    /// ```
    /// use distmeta_common::{PackageVersion, SemverOrder};
    /// use distmeta_enricher::pairs::VersionPairBuilder;
    ///
    /// let versions = [
    ///     PackageVersion::new("acme/widgets", "2.0.0"),
    ///     PackageVersion::new("acme/widgets", "1.0.0"),
    /// ];
    /// let pairs = VersionPairBuilder::new(&SemverOrder).build(&versions);
    ///
    /// assert_eq!(pairs[0].current.version(), "1.0.0");
    /// assert!(pairs[0].previous.is_none());
    /// assert_eq!(pairs[1].previous.map(PackageVersion::version), Some("1.0.0"));
    /// ```
    #[must_use]
    pub fn build<'v>(&self, versions: &'v [PackageVersion]) -> Vec<VersionPair<'v>> {
        self.build_indexed(versions.iter().enumerate())
    }

    /// Pair a subset of a collection, keeping each version's original index.
    #[must_use]
    pub fn build_indexed<'v>(
        &self,
        versions: impl IntoIterator<Item = (usize, &'v PackageVersion)>,
    ) -> Vec<VersionPair<'v>> {
        let mut groups: Vec<Vec<(usize, &'v PackageVersion)>> = Vec::new();
        let mut index_by_name: HashMap<&'v str, usize> = HashMap::new();

        for (position, package) in versions {
            let group = *index_by_name.entry(package.name()).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            if let Some(members) = groups.get_mut(group) {
                members.push((position, package));
            }
        }

        let mut pairs = Vec::new();
        for mut group in groups {
            group.sort_by(|(_, left), (_, right)| {
                self.order.compare(left.version(), right.version())
            });

            let previous =
                std::iter::once(None).chain(group.iter().map(|(_, package)| Some(*package)));
            pairs.extend(
                group
                    .iter()
                    .zip(previous)
                    .map(|(&(position, current), previous)| VersionPair {
                        position,
                        current,
                        previous,
                    }),
            );
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use distmeta_common::SemverOrder;
    use rstest::rstest;

    fn versions(specs: &[(&str, &str)]) -> Vec<PackageVersion> {
        specs
            .iter()
            .map(|(name, version)| PackageVersion::new(*name, *version))
            .collect()
    }

    fn summary<'a>(pairs: &[VersionPair<'a>]) -> Vec<(&'a str, Option<&'a str>)> {
        pairs
            .iter()
            .map(|pair| {
                (
                    pair.current.version(),
                    pair.previous.map(PackageVersion::version),
                )
            })
            .collect()
    }

    #[rstest]
    #[case::ascending(["1.0.0", "1.1.0", "2.0.0"])]
    #[case::descending(["2.0.0", "1.1.0", "1.0.0"])]
    #[case::shuffled(["1.1.0", "2.0.0", "1.0.0"])]
    fn pairs_follow_version_order(#[case] order: [&str; 3]) {
        let input = versions(&order.map(|version| ("acme/widgets", version)));
        let pairs = VersionPairBuilder::new(&SemverOrder).build(&input);

        assert_eq!(
            summary(&pairs),
            [
                ("1.0.0", None),
                ("1.1.0", Some("1.0.0")),
                ("2.0.0", Some("1.1.0")),
            ]
        );
    }

    #[rstest]
    fn positions_point_back_into_the_input() {
        let input = versions(&[("acme/widgets", "2.0.0"), ("acme/widgets", "1.0.0")]);
        let pairs = VersionPairBuilder::new(&SemverOrder).build(&input);

        assert_eq!(
            pairs.iter().map(|pair| pair.position).collect::<Vec<_>>(),
            [1, 0]
        );
    }

    #[rstest]
    fn groups_are_emitted_in_first_seen_order() {
        let input = versions(&[
            ("acme/zeta", "1.0.0"),
            ("acme/alpha", "1.0.0"),
            ("acme/zeta", "0.9.0"),
        ]);
        let pairs = VersionPairBuilder::new(&SemverOrder).build(&input);

        let names: Vec<_> = pairs.iter().map(|pair| pair.current.name()).collect();
        assert_eq!(names, ["acme/zeta", "acme/zeta", "acme/alpha"]);
        assert!(pairs.get(2).is_some_and(|pair| pair.previous.is_none()));
    }

    #[rstest]
    fn duplicates_are_kept_in_input_order() {
        let input = versions(&[
            ("acme/widgets", "1.0.0"),
            ("acme/widgets", "1.0.0"),
            ("acme/widgets", "0.1.0"),
        ]);
        let pairs = VersionPairBuilder::new(&SemverOrder).build(&input);

        assert_eq!(
            pairs.iter().map(|pair| pair.position).collect::<Vec<_>>(),
            [2, 0, 1]
        );
        assert_eq!(
            summary(&pairs),
            [
                ("0.1.0", None),
                ("1.0.0", Some("0.1.0")),
                ("1.0.0", Some("1.0.0")),
            ]
        );
    }

    #[rstest]
    fn pre_releases_precede_their_release() {
        let input = versions(&[("acme/widgets", "1.0.0"), ("acme/widgets", "1.0.0-beta")]);
        let pairs = VersionPairBuilder::new(&SemverOrder).build(&input);

        assert_eq!(
            summary(&pairs),
            [("1.0.0-beta", None), ("1.0.0", Some("1.0.0-beta"))]
        );
    }

    #[rstest]
    fn empty_input_yields_no_pairs() {
        assert!(VersionPairBuilder::new(&SemverOrder).build(&[]).is_empty());
    }
}
