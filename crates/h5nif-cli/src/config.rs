//! CLI configuration
//!
//! Output preferences come from environment variables. Bridge settings come
//! from `h5nif-config` (global file, h5nif.toml, H5NIF_* variables) with the
//! command-line flags applied last.

use anyhow::{Context, Result};
use h5nif_config::{ConfigLoader, LibraryConfig, ProjectConfig, RuntimeConfig};
use std::env;

/// Output preferences loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Default to JSON output (H5NIF_JSON=1)
    pub default_json: bool,
    /// Disable colored output (NO_COLOR)
    pub no_color: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            default_json: env::var("H5NIF_JSON")
                .map(|v| {
                    let lower = v.to_lowercase();
                    lower == "1" || lower == "true" || lower == "json"
                })
                .unwrap_or(false),
            no_color: env::var("NO_COLOR").is_ok(),
        }
    }

    pub fn apply_color(&self) {
        if self.no_color {
            colored::control::set_override(false);
        }
    }
}

/// Bridge settings given on the command line
#[derive(Debug, Clone, Default)]
pub struct BackendOverrides {
    pub backend: Option<String>,
    pub library: Option<String>,
}

impl BackendOverrides {
    fn as_project_config(&self) -> ProjectConfig {
        ProjectConfig {
            library: self.library.as_ref().map(|name| LibraryConfig {
                name: Some(name.clone()),
                search_paths: Vec::new(),
            }),
            runtime: self.backend.as_ref().map(|backend| RuntimeConfig {
                backend: Some(backend.clone()),
                max_type_name_len: None,
            }),
            logging: None,
        }
    }
}

/// Load bridge settings for the current directory and start logging
pub fn load(overrides: &BackendOverrides) -> Result<h5nif_config::Config> {
    let cwd = env::current_dir().context("Failed to read the current directory")?;
    let mut config = ConfigLoader::new()
        .load_from_directory(&cwd)
        .context("Failed to load h5nif configuration")?;
    let cli_settings = overrides.as_project_config();
    cli_settings
        .validate()
        .context("Invalid command-line option")?;
    config.settings.merge(&cli_settings);

    // A logger may already be installed when embedded in tests
    let _ = h5nif_runtime::logging::init(config.log_level());
    log::debug!(
        "backend {} library {} (project: {})",
        config.backend(),
        config.library_name(),
        config
            .project_root()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "none".to_string())
    );
    Ok(config)
}
