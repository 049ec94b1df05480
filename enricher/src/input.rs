//! Reading and writing the packages document.

use camino::Utf8Path;
use distmeta_common::PackageVersion;

use crate::error::RunError;

/// Read a JSON array of package versions.
///
/// # Errors
///
/// Returns [`RunError::ReadPackages`] when the file cannot be read and
/// [`RunError::ParsePackages`] when it is not a package array.
pub fn read_packages(path: &Utf8Path) -> Result<Vec<PackageVersion>, RunError> {
    let source = std::fs::read_to_string(path).map_err(|source| RunError::ReadPackages {
        path: path.to_owned(),
        source,
    })?;
    serde_json::from_str(&source).map_err(|source| RunError::ParsePackages {
        path: path.to_owned(),
        source,
    })
}

/// Write package versions as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns [`RunError::WritePackages`] when the file cannot be written.
pub fn write_packages(path: &Utf8Path, packages: &[PackageVersion]) -> Result<(), RunError> {
    let mut document = serde_json::to_string_pretty(packages).map_err(|source| {
        RunError::WritePackages {
            path: path.to_owned(),
            source: source.into(),
        }
    })?;
    document.push('\n');
    std::fs::write(path, document).map_err(|source| RunError::WritePackages {
        path: path.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use distmeta_common::DIST_README_URL_KEY;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn temp() -> (TempDir, Utf8PathBuf) {
        let dir = TempDir::new().expect("temp dir");
        let path = Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("UTF-8 path");
        (dir, path)
    }

    #[rstest]
    fn unknown_fields_survive_a_round_trip(temp: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = temp;
        let path = root.join("packages.json");
        std::fs::write(
            &path,
            r#"[{"name":"acme/widgets","version":"1.0.0","require":{"php":">=8.1"}}]"#,
        )
        .expect("write packages");

        let packages = read_packages(&path).expect("read packages");
        let enriched: Vec<_> = packages
            .into_iter()
            .map(|package| package.with_extra(DIST_README_URL_KEY, "https://x/readme.md"))
            .collect();
        write_packages(&path, &enriched).expect("write packages");

        let written = std::fs::read_to_string(&path).expect("read back");
        assert!(written.contains("\"require\""));
        assert!(written.contains("\"distReadmeUrl\""));
    }

    #[rstest]
    fn missing_file_is_a_read_error(temp: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = temp;
        assert!(matches!(
            read_packages(&root.join("absent.json")),
            Err(RunError::ReadPackages { .. })
        ));
    }

    #[rstest]
    fn non_array_document_is_a_parse_error(temp: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = temp;
        let path = root.join("packages.json");
        std::fs::write(&path, r#"{"packages": {}}"#).expect("write packages");

        assert!(matches!(
            read_packages(&path),
            Err(RunError::ParsePackages { .. })
        ));
    }
}
