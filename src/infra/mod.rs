pub mod adapters;
pub mod config;

pub use adapters::TomlConfigStore;
pub use config::{AppConfig, ConfigError, OutputFormat};
