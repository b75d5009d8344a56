//! Configuration module for folder-pager
//!
//! Holds the default sort policy for new pages, the log filter and the
//! local-source options. Configuration is stored in the user's config
//! directory (`~/.config/folder-pager/config.toml` on Linux) and can be
//! overridden with `FOLDER_PAGER_*` environment variables, e.g.
//! `FOLDER_PAGER_SORT_MODE=lmt`.

use crate::engine::EngineSettings;
use crate::sort::SortMode;
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "folder-pager";
const ENV_PREFIX: &str = "FOLDER_PAGER";

fn default_log_level() -> String {
    "warn".to_string()
}

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PagerConfig {
    /// Sort mode applied to freshly fetched pages
    #[serde(default)]
    pub sort_mode: SortMode,

    /// Reverse freshly fetched pages
    #[serde(default)]
    pub reversed: bool,

    /// Default tracing filter directive (overridden by `RUST_LOG`)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Include dot-files when listing local folders
    #[serde(default)]
    pub show_hidden: bool,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            sort_mode: SortMode::default(),
            reversed: false,
            log_level: default_log_level(),
            show_hidden: false,
        }
    }
}

impl PagerConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;

        Ok(config_dir.join(APP_DIR).join("config.toml"))
    }

    /// Load configuration from the default location, creating it if missing
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read, parsed, or created.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, creating a default file if missing
    ///
    /// Environment variables with the `FOLDER_PAGER_` prefix take precedence
    /// over the file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read, parsed, or created.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            Self::default().save_to(path)?;
        }

        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        settings.try_deserialize()
    }

    /// Save configuration to the default location
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config directory cannot be created, the configuration
    /// cannot be serialized to TOML, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Message(format!("Failed to create config directory: {e}")))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Engine settings derived from this configuration
    #[must_use]
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            sort_mode: self.sort_mode,
            reversed: self.reversed,
            ..EngineSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = PagerConfig::default();
        assert_eq!(config.sort_mode, SortMode::TypedName);
        assert!(!config.reversed);
        assert_eq!(config.log_level, "warn");
        assert!(!config.show_hidden);
    }

    #[test]
    fn test_load_creates_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = PagerConfig::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.sort_mode, PagerConfig::default().sort_mode);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let config = PagerConfig {
            sort_mode: SortMode::LMT,
            reversed: true,
            log_level: "debug".to_string(),
            show_hidden: true,
        };
        config.save_to(&path).unwrap();

        let loaded = PagerConfig::load_from(&path).unwrap();
        assert_eq!(loaded.sort_mode, SortMode::LMT);
        assert!(loaded.reversed);
        assert_eq!(loaded.log_level, "debug");
        assert!(loaded.show_hidden);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "sort_mode = \"typed-lmt\"\n").unwrap();

        let loaded = PagerConfig::load_from(&path).unwrap();
        assert_eq!(loaded.sort_mode, SortMode::TypedLMT);
        assert!(!loaded.reversed);
        assert_eq!(loaded.log_level, "warn");
    }

    #[test]
    fn test_invalid_sort_mode_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "sort_mode = \"size\"\n").unwrap();

        assert!(PagerConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_engine_settings() {
        let config = PagerConfig {
            sort_mode: SortMode::Name,
            reversed: true,
            ..PagerConfig::default()
        };
        let settings = config.engine_settings();
        assert_eq!(settings.sort_mode, SortMode::Name);
        assert!(settings.reversed);
        assert!(settings.command_buffer > 0);
    }
}
