//! Build configuration loader.
//!
//! Settings live in a TOML file (conventionally `distmeta.toml`) next to the
//! repository being built. Every key is optional: `BuildConfig` falls back to
//! defaults for anything omitted, and a missing file is equivalent to an empty
//! one when loaded through [`BuildConfig::load_or_default`].

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use thiserror::Error;

/// Conventional configuration filename.
pub const DEFAULT_CONFIG_FILE: &str = "distmeta.toml";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration {path}: {source}")]
    Read {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`BuildConfig`].
    #[error("invalid configuration {path}: {source}")]
    Parse {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },
}

/// Top-level build configuration.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct BuildConfig {
    /// Directory under which extraction workspaces are created. Defaults to
    /// the system temporary directory when absent.
    pub workspace_dir: Option<Utf8PathBuf>,
    /// Archive layout and selection settings.
    pub archive: ArchiveConfig,
}

impl BuildConfig {
    /// Parse configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns the TOML error when the source is malformed or carries unknown
    /// keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use distmeta::BuildConfig;
    ///
    /// let config = BuildConfig::from_toml("[archive]\ndirectory = \"dist\"\n")
    ///     .expect("valid configuration");
    /// assert_eq!(config.archive.directory.as_deref(), Some("dist"));
    /// ```
    pub fn from_toml(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    /// Load configuration from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read and
    /// [`ConfigError::Parse`] when its contents are invalid.
    pub fn load_from_path(path: &Utf8Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::from_toml(&source).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    /// Load configuration from `path`, or the defaults when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Utf8Path) -> Result<Self, ConfigError> {
        if path.as_std_path().is_file() {
            Self::load_from_path(path)
        } else {
            Ok(Self::default())
        }
    }
}

/// The `[archive]` block: where primary archives live and which versions are
/// archived at all.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct ArchiveConfig {
    /// Archive directory relative to the output root.
    pub directory: Option<String>,
    /// Absolute archive directory; wins over `directory` when both are set.
    pub absolute_directory: Option<Utf8PathBuf>,
    /// Leave development versions (`dev-*`, `*-dev`) alone.
    pub skip_dev: bool,
    /// Glob patterns a package name must match to be enriched. Empty means
    /// every package.
    pub whitelist: Vec<String>,
    /// Glob patterns excluding package names from enrichment.
    pub blacklist: Vec<String>,
}

impl ArchiveConfig {
    /// Resolve the base directory override for archive paths.
    ///
    /// Returns `absolute-directory` when configured, otherwise `directory`
    /// joined onto `output_root`, otherwise `None` (archives sit directly
    /// under the output root).
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use distmeta::ArchiveConfig;
    ///
    /// let config = ArchiveConfig {
    ///     directory: Some("dist".to_owned()),
    ///     ..ArchiveConfig::default()
    /// };
    /// assert_eq!(
    ///     config.base_dir_override(Utf8Path::new("/out")).as_deref(),
    ///     Some(Utf8Path::new("/out/dist"))
    /// );
    /// ```
    #[must_use]
    pub fn base_dir_override(&self, output_root: &Utf8Path) -> Option<Utf8PathBuf> {
        if let Some(absolute) = &self.absolute_directory {
            return Some(absolute.clone());
        }
        self.directory
            .as_deref()
            .map(str::trim)
            .filter(|directory| !directory.is_empty())
            .map(|directory| output_root.join(directory))
    }
}
