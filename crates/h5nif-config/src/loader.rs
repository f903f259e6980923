//! Configuration Loader
//!
//! Handles loading and merging configuration from multiple sources with proper precedence.

use crate::global::GlobalConfig;
use crate::project::{
    validate_backend, validate_level, validate_library_name, Backend, ProjectConfig,
};
use crate::{ConfigError, ConfigResult, DEFAULT_MAX_TYPE_NAME_LEN, PROJECT_CONFIG_FILE};
use std::env;
use std::path::{Path, PathBuf};

/// Default native library short name
const DEFAULT_LIBRARY: &str = "hdf5";

/// Default log level when neither configuration nor RUST_LOG set one
const DEFAULT_LOG_LEVEL: &str = "warn";

/// Configuration loader
///
/// Loads configuration from multiple sources and merges them with proper precedence:
/// 1. Global config (~/.h5nif/config.toml) - lowest priority
/// 2. Project config (./h5nif.toml) - overrides global
/// 3. Environment variables (H5NIF_*) - overrides project
/// 4. CLI flags - highest priority (handled by caller)
pub struct ConfigLoader {
    /// Cached global config path
    global_config_path: Option<PathBuf>,
}

/// Merged configuration result
#[derive(Debug, Clone)]
pub struct Config {
    /// Effective settings after merging every source
    pub settings: ProjectConfig,

    /// Directory where h5nif.toml was found
    pub project_root: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            global_config_path: None,
        }
    }

    /// Create a loader that reads the global config from a custom path
    pub fn with_global_config_path(path: PathBuf) -> Self {
        Self {
            global_config_path: Some(path),
        }
    }

    /// Load configuration starting from the given directory
    ///
    /// Walks up the directory tree to find h5nif.toml, then merges it over
    /// the global config and applies environment overrides.
    pub fn load_from_directory(&mut self, start_dir: &Path) -> ConfigResult<Config> {
        let (project_root, project_config) = self.find_project_config(start_dir)?;
        self.finish(project_root, project_config)
    }

    /// Load configuration from a specific project config file
    pub fn load_from_file(&mut self, config_path: &Path) -> ConfigResult<Config> {
        let project_config = ProjectConfig::load_from_file(config_path)?;
        let project_root = config_path.parent().map(|p| p.to_path_buf());
        self.finish(project_root, project_config)
    }

    fn finish(
        &mut self,
        project_root: Option<PathBuf>,
        project_config: ProjectConfig,
    ) -> ConfigResult<Config> {
        // A missing or unreadable home directory is not fatal; a broken file is
        let mut settings = match self.load_global_config() {
            Ok(global) => global.settings,
            Err(ConfigError::HomeNotFound) => ProjectConfig::default(),
            Err(e) => return Err(e),
        };
        settings.merge(&project_config);

        let settings = self.apply_env_overrides(settings)?;

        Ok(Config {
            settings,
            project_root,
        })
    }

    /// Find project configuration by walking up directory tree
    ///
    /// Returns (project_root, project_config) or the default config if none exists
    fn find_project_config(
        &self,
        start_dir: &Path,
    ) -> ConfigResult<(Option<PathBuf>, ProjectConfig)> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join(PROJECT_CONFIG_FILE);

            if config_path.exists() {
                let project_config = ProjectConfig::load_from_file(&config_path)?;
                return Ok((Some(current), project_config));
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Ok((None, ProjectConfig::default())),
            }
        }
    }

    /// Load global configuration from ~/.h5nif/config.toml
    fn load_global_config(&mut self) -> ConfigResult<GlobalConfig> {
        let path = match &self.global_config_path {
            Some(path) => path.clone(),
            None => {
                let path = GlobalConfig::global_config_path()?;
                self.global_config_path = Some(path.clone());
                path
            }
        };

        // Global config is optional - if it doesn't exist, return default
        if !path.exists() {
            return Ok(GlobalConfig::default());
        }

        GlobalConfig::load_from_file(&path)
    }

    /// Apply environment variable overrides
    ///
    /// - H5NIF_LIBRARY: library short name or path
    /// - H5NIF_BACKEND: "hdf5" or "memory"
    /// - H5NIF_LOG: default log level
    fn apply_env_overrides(&self, mut config: ProjectConfig) -> ConfigResult<ProjectConfig> {
        if let Ok(library) = env::var("H5NIF_LIBRARY") {
            validate_library_name("H5NIF_LIBRARY", &library)?;
            config.library.get_or_insert_with(Default::default).name = Some(library);
        }

        if let Ok(backend) = env::var("H5NIF_BACKEND") {
            validate_backend("H5NIF_BACKEND", &backend)?;
            config.runtime.get_or_insert_with(Default::default).backend = Some(backend);
        }

        if let Ok(level) = env::var("H5NIF_LOG") {
            validate_level("H5NIF_LOG", &level)?;
            config.logging.get_or_insert_with(Default::default).level = Some(level);
        }

        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Effective native library name (config > default)
    pub fn library_name(&self) -> &str {
        self.settings.library_name().unwrap_or(DEFAULT_LIBRARY)
    }

    /// Extra library search paths
    pub fn search_paths(&self) -> &[PathBuf] {
        self.settings
            .library
            .as_ref()
            .map(|l| l.search_paths.as_slice())
            .unwrap_or(&[])
    }

    /// Effective backend
    pub fn backend(&self) -> Backend {
        self.settings.backend().unwrap_or_default()
    }

    /// Effective type name bound
    pub fn max_type_name_len(&self) -> usize {
        self.settings
            .max_type_name_len()
            .unwrap_or(DEFAULT_MAX_TYPE_NAME_LEN)
    }

    /// Effective default log level
    pub fn log_level(&self) -> &str {
        self.settings.log_level().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// Get the project root directory
    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    /// Check if an h5nif.toml was found
    pub fn is_project(&self) -> bool {
        self.project_root.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settings: ProjectConfig::default(),
            project_root: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn create_config_file(dir: &Path, content: &str) -> PathBuf {
        let config_path = dir.join(PROJECT_CONFIG_FILE);
        fs::write(&config_path, content).unwrap();
        config_path
    }

    fn isolated_loader(dir: &Path) -> ConfigLoader {
        ConfigLoader::with_global_config_path(dir.join("no-global.toml"))
    }

    #[test]
    #[serial]
    fn test_load_project_config() {
        let temp_dir = TempDir::new().unwrap();
        create_config_file(
            temp_dir.path(),
            r#"
[runtime]
backend = "memory"
"#,
        );

        let mut loader = isolated_loader(temp_dir.path());
        let config = loader.load_from_directory(temp_dir.path()).unwrap();

        assert_eq!(config.backend(), Backend::Memory);
        assert!(config.is_project());
    }

    #[test]
    #[serial]
    fn test_find_config_in_parent() {
        let temp_dir = TempDir::new().unwrap();
        create_config_file(
            temp_dir.path(),
            r#"
[library]
name = "hdf5_serial"
"#,
        );

        let sub_dir = temp_dir.path().join("subdir");
        fs::create_dir(&sub_dir).unwrap();

        let mut loader = isolated_loader(temp_dir.path());
        let config = loader.load_from_directory(&sub_dir).unwrap();

        assert_eq!(config.library_name(), "hdf5_serial");
        assert_eq!(config.project_root(), Some(temp_dir.path()));
    }

    #[test]
    #[serial]
    fn test_defaults_without_any_config() {
        let temp_dir = TempDir::new().unwrap();

        let mut loader = isolated_loader(temp_dir.path());
        let config = loader.load_from_directory(temp_dir.path()).unwrap();

        assert!(!config.is_project());
        assert_eq!(config.library_name(), "hdf5");
        assert_eq!(config.backend(), Backend::Hdf5);
        assert_eq!(config.max_type_name_len(), DEFAULT_MAX_TYPE_NAME_LEN);
        assert_eq!(config.log_level(), "warn");
    }

    #[test]
    #[serial]
    fn test_env_override_backend() {
        let temp_dir = TempDir::new().unwrap();
        create_config_file(
            temp_dir.path(),
            r#"
[runtime]
backend = "hdf5"
"#,
        );

        env::set_var("H5NIF_BACKEND", "memory");

        let mut loader = isolated_loader(temp_dir.path());
        let config = loader.load_from_directory(temp_dir.path());

        env::remove_var("H5NIF_BACKEND");
        assert_eq!(config.unwrap().backend(), Backend::Memory);
    }

    #[test]
    #[serial]
    fn test_env_override_invalid_backend() {
        let temp_dir = TempDir::new().unwrap();

        env::set_var("H5NIF_BACKEND", "zarr");

        let mut loader = isolated_loader(temp_dir.path());
        let result = loader.load_from_directory(temp_dir.path());

        env::remove_var("H5NIF_BACKEND");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    #[serial]
    fn test_global_config_is_overridden_by_project() {
        let temp_dir = TempDir::new().unwrap();
        let global_path = temp_dir.path().join("global.toml");
        fs::write(
            &global_path,
            r#"
[library]
name = "hdf5_global"

[logging]
level = "info"
"#,
        )
        .unwrap();
        let project = create_config_file(
            temp_dir.path(),
            r#"
[library]
name = "hdf5_project"
"#,
        );

        let mut loader = ConfigLoader::with_global_config_path(global_path);
        let config = loader.load_from_file(&project).unwrap();

        assert_eq!(config.library_name(), "hdf5_project");
        assert_eq!(config.log_level(), "info");
    }
}
