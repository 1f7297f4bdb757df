//! Configuration loading from files.
//!
//! This module handles reading and parsing configuration files.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::{Config, ConfigError};

/// Default config file name, looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "error-pages.yaml";

impl Config {
    /// Load the config from the command line argument, defaulting to `error-pages.yaml`
    pub fn load_from_arg(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config_file = config_file.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
        let config_file = if config_file.is_relative() {
            std::env::current_dir()
                .map_err(ConfigError::CwdFailure)?
                .join(config_file)
        } else {
            config_file.to_path_buf()
        };

        Self::load_from_file(&config_file)
    }

    /// Load and validate the config from a file path
    pub(crate) fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "loading config");

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;

        let mut config: Config = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.base_path = base_path_from_config(path);
        config.validate()?;

        Ok(config)
    }
}

/// Get the base path from a config file path (its parent directory).
pub fn base_path_from_config(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}
