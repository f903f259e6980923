//! h5nif Configuration System
//!
//! Provides configuration management for the HDF5 datatype bridge:
//! - Project configuration (h5nif.toml)
//! - Global user configuration (~/.h5nif/config.toml)
//! - Configuration precedence and merging
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded and merged in the following order (later overrides earlier):
//! 1. Global config (~/.h5nif/config.toml)
//! 2. Project config (./h5nif.toml)
//! 3. Environment variables (H5NIF_*)
//! 4. CLI flags
//!
//! # Example
//!
//! ```no_run
//! use h5nif_config::ConfigLoader;
//! use std::path::Path;
//!
//! let mut loader = ConfigLoader::new();
//! let config = loader.load_from_directory(Path::new(".")).unwrap();
//! println!("backend: {}", config.backend());
//! ```

pub mod global;
pub mod loader;
pub mod project;

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Home directory not found")]
    HomeNotFound,
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Name of the project-level configuration file
pub const PROJECT_CONFIG_FILE: &str = "h5nif.toml";

/// Default upper bound (exclusive) on the byte length of a type name argument
pub const DEFAULT_MAX_TYPE_NAME_LEN: usize = 1024;

/// Largest accepted `runtime.max_type_name_len`
pub const MAX_TYPE_NAME_LEN_LIMIT: usize = 64 * 1024;

// Re-export main types
pub use global::GlobalConfig;
pub use loader::{Config, ConfigLoader};
pub use project::{Backend, LibraryConfig, LoggingConfig, ProjectConfig, RuntimeConfig};
