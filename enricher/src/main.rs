//! distmeta enricher CLI entrypoint.
//!
//! Loads the build configuration and the packages document, publishes
//! changelog and readme artifacts next to the built archives, and writes the
//! enriched document back.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use distmeta::{BuildConfig, DEFAULT_CONFIG_FILE};
use distmeta_common::SemverOrder;
use distmeta_enricher::cli::Cli;
use distmeta_enricher::context::EnrichContext;
use distmeta_enricher::diff::LineDiffEngine;
use distmeta_enricher::dist_path::DistPathResolver;
use distmeta_enricher::error::RunError;
use distmeta_enricher::extraction::DistExtractor;
use distmeta_enricher::filter::ArchiveFilter;
use distmeta_enricher::fs::LocalFilesystem;
use distmeta_enricher::input::{read_packages, write_packages};
use distmeta_enricher::output::{init_logging, summary_message, write_stderr_line};
use distmeta_enricher::pipeline::enrich;
use distmeta_enricher::workspace::{UuidGenerator, WorkspaceFactory};
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbosity, cli.quiet);

    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stderr: &mut dyn Write) -> Result<(), RunError> {
    let config = load_config(cli.config.as_deref(), Utf8Path::new(DEFAULT_CONFIG_FILE))?;
    let filter = ArchiveFilter::from_config(&config.archive)?;
    let packages = read_packages(&cli.packages)?;
    let workspace_root = workspace_root(&config)?;

    let ids = UuidGenerator;
    let fs = LocalFilesystem;
    let extractor = DistExtractor;
    let context = EnrichContext {
        resolver: DistPathResolver::new(
            &cli.output_dir,
            config.archive.base_dir_override(&cli.output_dir),
        ),
        workspaces: WorkspaceFactory::new(workspace_root, &ids, &fs, &extractor),
        fs: &fs,
        order: &SemverOrder,
        filter,
    };

    let report = enrich(&context, &LineDiffEngine, &packages, cli.pipeline_options());
    write_packages(cli.output_path(), &report.packages)?;

    if !cli.quiet {
        write_stderr_line(stderr, summary_message(&report));
    }
    Ok(())
}

/// Load the explicit configuration, else `fallback` when it exists.
fn load_config(path: Option<&Utf8Path>, fallback: &Utf8Path) -> Result<BuildConfig, RunError> {
    let config = match path {
        Some(explicit) => BuildConfig::load_from_path(explicit)?,
        None => BuildConfig::load_or_default(fallback)?,
    };
    Ok(config)
}

fn workspace_root(config: &BuildConfig) -> Result<Utf8PathBuf, RunError> {
    match &config.workspace_dir {
        Some(dir) => Ok(dir.clone()),
        None => Utf8PathBuf::try_from(std::env::temp_dir())
            .map_err(|err| RunError::NonUtf8TempDir(err.into_path_buf().display().to_string())),
    }
}

fn exit_code_for_run_result(result: Result<(), RunError>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, err);
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn exit_code_for_run_result_returns_zero_on_success() {
        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Ok(()), &mut stderr);
        assert_eq!(exit_code, 0);
        assert!(stderr.is_empty());
    }

    #[test]
    fn exit_code_for_run_result_prints_error_and_returns_one() {
        let err = RunError::NonUtf8TempDir("/tmp/\u{fffd}".to_owned());

        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Err(err), &mut stderr);
        assert_eq!(exit_code, 1);

        let stderr_text = String::from_utf8(stderr).expect("stderr was not UTF-8");
        assert!(stderr_text.contains("is not valid UTF-8"));
    }

    #[test]
    fn workspace_root_prefers_configuration() {
        let config = BuildConfig {
            workspace_dir: Some(Utf8PathBuf::from("/var/tmp/distmeta")),
            ..BuildConfig::default()
        };
        assert_eq!(
            workspace_root(&config).expect("workspace root"),
            "/var/tmp/distmeta"
        );
    }

    #[rstest]
    #[case::malformed_config(true)]
    #[case::empty_config(false)]
    fn run_rejects_malformed_inputs(#[case] malformed_config: bool) {
        let temp = tempfile::tempdir().expect("temp dir");
        let root = Utf8PathBuf::try_from(temp.path().to_path_buf()).expect("UTF-8 path");
        let config = root.join("distmeta.toml");
        let config_source = if malformed_config { "skip = true" } else { "" };
        std::fs::write(&config, config_source).expect("write config");
        let packages = root.join("packages.json");
        std::fs::write(&packages, "{}").expect("write packages");
        let cli = Cli::parse_from([
            "distmeta-enricher",
            "-c",
            config.as_str(),
            packages.as_str(),
            root.as_str(),
        ]);

        let mut stderr = Vec::new();
        let result = run(&cli, &mut stderr);
        if malformed_config {
            assert!(matches!(result, Err(RunError::Config(_))));
        } else {
            assert!(matches!(result, Err(RunError::ParsePackages { .. })));
        }
    }

    #[rstest]
    #[case::absent(None, None)]
    #[case::present(Some("workspace-dir = \"/var/tmp/distmeta\"\n"), Some("/var/tmp/distmeta"))]
    fn fallback_config_is_optional(#[case] source: Option<&str>, #[case] expected: Option<&str>) {
        let temp = tempfile::tempdir().expect("temp dir");
        let root = Utf8PathBuf::try_from(temp.path().to_path_buf()).expect("UTF-8 path");
        let fallback = root.join(DEFAULT_CONFIG_FILE);
        if let Some(text) = source {
            std::fs::write(&fallback, text).expect("write config");
        }

        let config = load_config(None, &fallback).expect("fallback config");

        assert_eq!(config.workspace_dir.as_deref().map(Utf8Path::as_str), expected);
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let result = load_config(
            Some(Utf8Path::new("/nonexistent/distmeta.toml")),
            Utf8Path::new("/nonexistent/fallback.toml"),
        );
        assert!(matches!(result, Err(RunError::Config(_))));
    }

    #[test]
    fn run_rejects_missing_packages_document() {
        let temp = tempfile::tempdir().expect("temp dir");
        let root = Utf8PathBuf::try_from(temp.path().to_path_buf()).expect("UTF-8 path");
        let config = root.join("distmeta.toml");
        std::fs::write(&config, "").expect("write config");
        let cli = Cli::parse_from([
            "distmeta-enricher",
            "-c",
            config.as_str(),
            root.join("absent.json").as_str(),
            root.as_str(),
        ]);

        let mut stderr = Vec::new();
        let result = run(&cli, &mut stderr);
        assert!(matches!(result, Err(RunError::ReadPackages { .. })));
    }
}
