//! Global Configuration (~/.h5nif/config.toml)
//!
//! Handles user-level configuration stored in `~/.h5nif/config.toml`. It
//! shares the project file's schema and sits below it in precedence.

use crate::project::ProjectConfig;
use crate::{ConfigError, ConfigResult};
use std::path::{Path, PathBuf};

/// Global user configuration from ~/.h5nif/config.toml
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GlobalConfig {
    pub settings: ProjectConfig,
}

impl GlobalConfig {
    /// Load global configuration from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let settings = ProjectConfig::load_from_file(path)?;
        Ok(Self { settings })
    }

    /// Get the global config file path (~/.h5nif/config.toml)
    pub fn global_config_path() -> ConfigResult<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        Ok(home.join(".h5nif").join("config.toml"))
    }

    /// Get the default library name
    pub fn default_library(&self) -> Option<&str> {
        self.settings.library_name()
    }
}
