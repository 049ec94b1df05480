//! Shared configuration for the distmeta repository enrichment tools.

pub mod config;

pub use config::{ArchiveConfig, BuildConfig, ConfigError, DEFAULT_CONFIG_FILE};
