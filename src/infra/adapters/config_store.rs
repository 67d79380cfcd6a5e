use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{AppConfig, CURRENT_VERSION, ConfigError};

const CONFIG_FILE_NAME: &str = "config.toml";

pub struct TomlConfigStore {
    config_dir: PathBuf,
}

impl TomlConfigStore {
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = get_config_dir()?;
        Ok(Self { config_dir })
    }

    pub fn with_config_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    pub fn storage_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    /// Defaults when the file does not exist yet.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let path = self.storage_path();

        if !path.exists() {
            debug!(target: "sqlctx::config", path = %path.display(), "no config file, using defaults");
            return Ok(AppConfig::default());
        }

        Self::load_from(&path)
    }

    /// Loads an explicitly named file, which must exist.
    pub fn load_from(path: &Path) -> Result<AppConfig, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: AppConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if config.version != CURRENT_VERSION {
            return Err(ConfigError::VersionMismatch {
                found: config.version,
                expected: CURRENT_VERSION,
            });
        }

        debug!(target: "sqlctx::config", path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        let path = self.storage_path();
        let write_error = |message: String| ConfigError::Write {
            path: path.clone(),
            message,
        };

        if !self.config_dir.exists() {
            fs::create_dir_all(&self.config_dir).map_err(|e| write_error(e.to_string()))?;
        }

        let content = toml::to_string_pretty(config).map_err(|e| write_error(e.to_string()))?;
        let content_with_header = format!("# sqlctx configuration\n\n{content}");

        fs::write(&path, content_with_header).map_err(|e| write_error(e.to_string()))?;

        Ok(())
    }
}

fn get_config_dir() -> Result<PathBuf, ConfigError> {
    let config_base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(config_base.join("sqlctx"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use tempfile::TempDir;

    fn store_in(temp_dir: &TempDir) -> TomlConfigStore {
        TomlConfigStore::with_config_dir(temp_dir.path().to_path_buf())
    }

    mod load {
        use super::*;

        #[test]
        fn returns_defaults_when_no_file_exists() {
            let temp_dir = TempDir::new().unwrap();

            let config = store_in(&temp_dir).load().unwrap();

            assert_eq!(config, AppConfig::default());
        }

        #[test]
        fn reads_existing_file() {
            let temp_dir = TempDir::new().unwrap();
            fs::write(
                temp_dir.path().join(CONFIG_FILE_NAME),
                "version = 1\n[output]\nformat = \"json\"\n",
            )
            .unwrap();

            let config = store_in(&temp_dir).load().unwrap();

            assert_eq!(config.output.format, OutputFormat::Json);
        }

        #[test]
        fn returns_version_mismatch_for_unknown_version() {
            let temp_dir = TempDir::new().unwrap();
            fs::write(temp_dir.path().join(CONFIG_FILE_NAME), "version = 2\n").unwrap();

            let result = store_in(&temp_dir).load();

            assert!(matches!(
                result,
                Err(ConfigError::VersionMismatch {
                    found: 2,
                    expected: 1
                })
            ));
        }

        #[test]
        fn returns_parse_error_for_invalid_toml() {
            let temp_dir = TempDir::new().unwrap();
            fs::write(temp_dir.path().join(CONFIG_FILE_NAME), "invalid toml {{{{").unwrap();

            let result = store_in(&temp_dir).load();

            assert!(matches!(result, Err(ConfigError::Parse { .. })));
        }

        #[test]
        fn explicit_missing_file_is_a_read_error() {
            let temp_dir = TempDir::new().unwrap();
            let path = temp_dir.path().join("absent.toml");

            let result = TomlConfigStore::load_from(&path);

            assert!(matches!(result, Err(ConfigError::Read { .. })));
        }
    }

    mod save {
        use super::*;

        #[test]
        fn creates_config_directory_if_missing() {
            let temp_dir = TempDir::new().unwrap();
            let config_dir = temp_dir.path().join("nested").join("sqlctx");
            let store = TomlConfigStore::with_config_dir(config_dir.clone());

            store.save(&AppConfig::default()).unwrap();

            assert!(config_dir.exists());
            assert!(store.storage_path().exists());
        }

        #[test]
        fn save_and_load_preserves_data() {
            let temp_dir = TempDir::new().unwrap();
            let store = store_in(&temp_dir);
            let mut config = AppConfig::default();
            config.cache.capacity = 8;
            config.log.filter = Some("sqlctx=trace".to_string());
            config.safety.destructive_keywords = Some(vec!["drop".to_string()]);

            store.save(&config).unwrap();

            assert_eq!(store.load().unwrap(), config);
        }
    }

    #[test]
    fn storage_path_is_config_toml_in_dir() {
        let temp_dir = TempDir::new().unwrap();

        assert_eq!(
            store_in(&temp_dir).storage_path(),
            temp_dir.path().join(CONFIG_FILE_NAME)
        );
    }
}
