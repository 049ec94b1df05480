//! Behaviour-driven tests for changelog artifact publication.
//!
//! Scenarios build real zip archives in a sandbox output root and run the
//! changelog step with the production extractor, diff engine and
//! filesystem.

mod support;

use std::cell::RefCell;

use distmeta_common::{DIST_CHANGELOG_URL_KEY, PackageVersion};
use distmeta_enricher::changelog::ChangelogExtractor;
use distmeta_enricher::diff::LineDiffEngine;
use distmeta_enricher::fs::LocalFilesystem;
use distmeta_enricher::report::EnrichReport;
use distmeta_enricher::test_utils::{Sandbox, artifact_url, read_file};
use distmeta_enricher::workspace::SequentialIdGenerator;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use support::{CountingExtractor, build_release};

const NAME: &str = "acme/widgets";

struct ChangelogWorld {
    sandbox: Sandbox,
    packages: RefCell<Vec<PackageVersion>>,
    report: RefCell<Option<EnrichReport>>,
}

#[fixture]
fn changelog_world() -> ChangelogWorld {
    ChangelogWorld {
        sandbox: Sandbox::new(),
        packages: RefCell::new(Vec::new()),
        report: RefCell::new(None),
    }
}

fn unescape(text: &str) -> String {
    text.replace("\\n", "\n")
}

fn enriched(changelog_world: &ChangelogWorld, version: &str) -> PackageVersion {
    let report = changelog_world.report.borrow();
    report
        .as_ref()
        .expect("changelogs should be extracted")
        .packages
        .iter()
        .find(|package| package.pretty_version() == version)
        .cloned()
        .unwrap_or_else(|| panic!("version {version} should be in the report"))
}

#[given("release \"{version}\" with changelog \"{text}\"")]
fn release_with_changelog(changelog_world: &ChangelogWorld, version: String, text: String) {
    let changelog = unescape(&text);
    let package = build_release(
        &changelog_world.sandbox,
        NAME,
        &version,
        &[("changelog.md", changelog.as_str()), ("src/Widget.php", "<?php")],
    );
    changelog_world.packages.borrow_mut().push(package);
}

#[given("release \"{version}\" without a changelog")]
fn release_without_changelog(changelog_world: &ChangelogWorld, version: String) {
    let package = build_release(
        &changelog_world.sandbox,
        NAME,
        &version,
        &[("src/Widget.php", "<?php")],
    );
    changelog_world.packages.borrow_mut().push(package);
}

#[when("changelogs are extracted")]
fn extract_changelogs(changelog_world: &ChangelogWorld) {
    let ids = SequentialIdGenerator::default();
    let extractor = CountingExtractor::default();
    let context = changelog_world
        .sandbox
        .context(&ids, &LocalFilesystem, &extractor);
    let packages = changelog_world.packages.borrow();

    let report = ChangelogExtractor::new(&context, &LineDiffEngine).extract(&packages);
    changelog_world.report.replace(Some(report));
}

#[then("the changelog for \"{version}\" reads \"{text}\"")]
fn changelog_reads(changelog_world: &ChangelogWorld, version: String, text: String) {
    let package = enriched(changelog_world, &version);
    let path = changelog_world.sandbox.resolver().changelog_path(&package);
    assert_eq!(read_file(&path), unescape(&text));
}

#[then("the changelog for \"{version}\" adds \"{line}\"")]
fn changelog_adds(changelog_world: &ChangelogWorld, version: String, line: String) {
    let package = enriched(changelog_world, &version);
    let path = changelog_world.sandbox.resolver().changelog_path(&package);
    let artifact = read_file(&path);
    assert!(
        artifact.lines().any(|candidate| candidate == format!("+{line}")),
        "expected '+{line}' in:\n{artifact}"
    );
}

#[then("version \"{version}\" records its changelog URL")]
fn records_changelog_url(changelog_world: &ChangelogWorld, version: String) {
    let package = enriched(changelog_world, &version);
    let expected = artifact_url(NAME, &format!("changelog-{version}.md"));
    assert_eq!(
        package.extra_str(DIST_CHANGELOG_URL_KEY),
        Some(expected.as_str())
    );
}

#[then("version \"{version}\" has no changelog URL")]
fn has_no_changelog_url(changelog_world: &ChangelogWorld, version: String) {
    let package = enriched(changelog_world, &version);
    assert!(package.extra_str(DIST_CHANGELOG_URL_KEY).is_none());
}

#[then("no extraction workspace is left behind")]
fn no_workspace_left(changelog_world: &ChangelogWorld) {
    assert!(changelog_world.sandbox.leftover_workspaces().is_empty());
}

#[scenario("tests/features/changelog.feature", index = 0)]
fn scenario_oldest_version(changelog_world: ChangelogWorld) {
    let _ = changelog_world;
}

#[scenario("tests/features/changelog.feature", index = 1)]
fn scenario_later_version(changelog_world: ChangelogWorld) {
    let _ = changelog_world;
}

#[scenario("tests/features/changelog.feature", index = 2)]
fn scenario_missing_changelog(changelog_world: ChangelogWorld) {
    let _ = changelog_world;
}
