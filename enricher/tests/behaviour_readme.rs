//! Behaviour-driven tests for readme snapshot publication.

mod support;

use std::cell::RefCell;

use distmeta_common::{DIST_README_URL_KEY, PackageVersion};
use distmeta_enricher::fs::LocalFilesystem;
use distmeta_enricher::readme::ReadmeExtractor;
use distmeta_enricher::report::EnrichReport;
use distmeta_enricher::test_utils::{Sandbox, artifact_url, read_file, write_file};
use distmeta_enricher::workspace::SequentialIdGenerator;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use support::{CountingExtractor, build_release};

const NAME: &str = "acme/widgets";

struct ReadmeWorld {
    sandbox: Sandbox,
    ids: SequentialIdGenerator,
    packages: RefCell<Vec<PackageVersion>>,
    runs: RefCell<Vec<(EnrichReport, usize)>>,
}

#[fixture]
fn readme_world() -> ReadmeWorld {
    ReadmeWorld {
        sandbox: Sandbox::new(),
        ids: SequentialIdGenerator::default(),
        packages: RefCell::new(Vec::new()),
        runs: RefCell::new(Vec::new()),
    }
}

fn run_readme_step(readme_world: &ReadmeWorld) {
    let extractor = CountingExtractor::default();
    let context = readme_world
        .sandbox
        .context(&readme_world.ids, &LocalFilesystem, &extractor);
    let packages = readme_world.packages.borrow();

    let report = ReadmeExtractor::new(&context).extract(&packages);
    readme_world
        .runs
        .borrow_mut()
        .push((report, extractor.count()));
}

fn readme_urls(report: &EnrichReport) -> Vec<(String, Option<String>)> {
    report
        .packages
        .iter()
        .map(|package| {
            (
                package.pretty_version().to_owned(),
                package.extra_str(DIST_README_URL_KEY).map(str::to_owned),
            )
        })
        .collect()
}

fn first_run(readme_world: &ReadmeWorld) -> EnrichReport {
    readme_world
        .runs
        .borrow()
        .first()
        .map(|(report, _)| report.clone())
        .expect("readmes should be extracted")
}

#[given("release \"{version}\" with readme \"{text}\"")]
fn release_with_readme(readme_world: &ReadmeWorld, version: String, text: String) {
    let package = build_release(
        &readme_world.sandbox,
        NAME,
        &version,
        &[("readme.md", text.as_str()), ("changelog.md", "A\n")],
    );
    readme_world.packages.borrow_mut().push(package);
}

#[given("release \"{version}\" without a readme")]
fn release_without_readme(readme_world: &ReadmeWorld, version: String) {
    let package = build_release(
        &readme_world.sandbox,
        NAME,
        &version,
        &[("changelog.md", "A\n")],
    );
    readme_world.packages.borrow_mut().push(package);
}

#[given("the changelog artifact of \"{version}\" has been published")]
fn changelog_published(readme_world: &ReadmeWorld, version: String) {
    let packages = readme_world.packages.borrow();
    let package = packages
        .iter()
        .find(|package| package.pretty_version() == version)
        .expect("release should exist");
    write_file(
        &readme_world.sandbox.resolver().changelog_path(package),
        "A\n",
    );
}

#[when("readmes are extracted")]
fn extract_readmes(readme_world: &ReadmeWorld) {
    run_readme_step(readme_world);
}

#[when("the readme step runs a second time")]
fn extract_readmes_again(readme_world: &ReadmeWorld) {
    run_readme_step(readme_world);
}

#[then("the published readme reads \"{text}\"")]
fn published_readme_reads(readme_world: &ReadmeWorld, text: String) {
    let packages = readme_world.packages.borrow();
    let package = packages.first().expect("a release");
    let path = readme_world.sandbox.resolver().readme_path(package);
    assert_eq!(read_file(&path), text);
}

#[then("no readme is published")]
fn no_readme_published(readme_world: &ReadmeWorld) {
    let packages = readme_world.packages.borrow();
    let package = packages.first().expect("a release");
    assert!(!readme_world.sandbox.resolver().readme_path(package).exists());
}

#[then("only version \"{version}\" records the readme URL")]
fn only_version_records_url(readme_world: &ReadmeWorld, version: String) {
    let expected = artifact_url(NAME, "readme.md");
    for (pretty, url) in readme_urls(&first_run(readme_world)) {
        if pretty == version {
            assert_eq!(url.as_deref(), Some(expected.as_str()));
        } else {
            assert!(url.is_none(), "version {pretty} should not be annotated");
        }
    }
}

#[then("the second run extracted nothing")]
fn second_run_extracted_nothing(readme_world: &ReadmeWorld) {
    let runs = readme_world.runs.borrow();
    let counts: Vec<usize> = runs.iter().map(|(_, count)| *count).collect();
    assert_eq!(counts, [1, 0]);
}

#[then("both runs record the same readme URL")]
fn both_runs_agree(readme_world: &ReadmeWorld) {
    let runs = readme_world.runs.borrow();
    let urls: Vec<_> = runs.iter().map(|(report, _)| readme_urls(report)).collect();
    assert_eq!(urls.len(), 2);
    assert_eq!(urls.first(), urls.last());
    assert!(
        urls.first()
            .and_then(|run| run.first())
            .is_some_and(|(_, url)| url.is_some())
    );
}

#[scenario("tests/features/readme.feature", index = 0)]
fn scenario_highest_version(readme_world: ReadmeWorld) {
    let _ = readme_world;
}

#[scenario("tests/features/readme.feature", index = 1)]
fn scenario_missing_readme(readme_world: ReadmeWorld) {
    let _ = readme_world;
}

#[scenario("tests/features/readme.feature", index = 2)]
fn scenario_second_run(readme_world: ReadmeWorld) {
    let _ = readme_world;
}
