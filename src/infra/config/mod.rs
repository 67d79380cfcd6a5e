pub mod app_config;

use std::path::PathBuf;

use thiserror::Error;

pub use app_config::{
    AppConfig, CURRENT_VERSION, CacheConfig, LogConfig, OutputConfig, OutputFormat, SafetyConfig,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not find a config directory for this platform")]
    NoConfigDir,
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to write {}: {message}", path.display())]
    Write { path: PathBuf, message: String },
    #[error("config version mismatch: found {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },
}
