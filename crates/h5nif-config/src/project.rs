//! Project Configuration (h5nif.toml)
//!
//! Handles bridge configuration stored in `h5nif.toml`. The same schema is
//! used by the global configuration file.

use crate::{ConfigError, ConfigResult, MAX_TYPE_NAME_LEN_LIMIT};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Bridge configuration from h5nif.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Native library location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library: Option<LibraryConfig>,

    /// Runtime behavior
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<RuntimeConfig>,

    /// Logging configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

/// Native library location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct LibraryConfig {
    /// Library short name ("hdf5") or absolute path to the shared object
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Extra directories searched before the platform defaults
    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub search_paths: Vec<PathBuf>,
}

/// Runtime behavior
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Datatype backend: "hdf5" or "memory"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,

    /// Type names at or beyond this byte length are rejected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_type_name_len: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default level when RUST_LOG is unset ("off", "error", "warn", "info", "debug", "trace")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

/// Datatype backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// System HDF5 shared library loaded at runtime
    #[default]
    Hdf5,
    /// In-process datatype table
    Memory,
}

impl Backend {
    /// Parse a backend name as written in configuration
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "hdf5" => Some(Backend::Hdf5),
            "memory" => Some(Backend::Memory),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Hdf5 => "hdf5",
            Backend::Memory => "memory",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ProjectConfig {
    /// Load project configuration from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        let config = Self::parse(&content).map_err(|e| match e {
            ConfigError::TomlParseError { error, .. } => ConfigError::TomlParseError {
                file: path.to_path_buf(),
                error,
            },
            other => other,
        })?;

        Ok(config)
    }

    /// Parse and validate configuration from a TOML string
    pub fn parse(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::TomlParseError {
            file: PathBuf::new(),
            error: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate field values that the TOML schema alone cannot express
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(runtime) = &self.runtime {
            if let Some(backend) = &runtime.backend {
                validate_backend("runtime.backend", backend)?;
            }
            if let Some(len) = runtime.max_type_name_len {
                validate_name_len("runtime.max_type_name_len", len)?;
            }
        }

        if let Some(level) = self.logging.as_ref().and_then(|l| l.level.as_deref()) {
            validate_level("logging.level", level)?;
        }

        if let Some(name) = self.library.as_ref().and_then(|l| l.name.as_deref()) {
            validate_library_name("library.name", name)?;
        }

        Ok(())
    }

    /// Get the configured library name
    pub fn library_name(&self) -> Option<&str> {
        self.library.as_ref().and_then(|l| l.name.as_deref())
    }

    /// Get the configured backend
    pub fn backend(&self) -> Option<Backend> {
        self.runtime
            .as_ref()
            .and_then(|r| r.backend.as_deref())
            .and_then(Backend::parse)
    }

    /// Get the configured type name bound
    pub fn max_type_name_len(&self) -> Option<usize> {
        self.runtime.as_ref().and_then(|r| r.max_type_name_len)
    }

    /// Get the configured log level
    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }

    /// Merge another configuration into this one
    /// Other config takes precedence for non-None values
    pub fn merge(&mut self, other: &ProjectConfig) {
        if let Some(other_lib) = &other.library {
            let lib = self.library.get_or_insert_with(Default::default);
            if other_lib.name.is_some() {
                lib.name = other_lib.name.clone();
            }
            // Search paths accumulate; the overriding file's paths come first
            let mut paths = other_lib.search_paths.clone();
            paths.extend(lib.search_paths.drain(..));
            lib.search_paths = paths;
        }
        if let Some(other_rt) = &other.runtime {
            let rt = self.runtime.get_or_insert_with(Default::default);
            if other_rt.backend.is_some() {
                rt.backend = other_rt.backend.clone();
            }
            if other_rt.max_type_name_len.is_some() {
                rt.max_type_name_len = other_rt.max_type_name_len;
            }
        }
        if let Some(other_log) = &other.logging {
            if other_log.level.is_some() {
                self.logging = Some(other_log.clone());
            }
        }
    }
}

pub(crate) fn validate_backend(field: &str, value: &str) -> ConfigResult<()> {
    if Backend::parse(value).is_none() {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("must be 'hdf5' or 'memory', got '{}'", value),
        });
    }
    Ok(())
}

pub(crate) fn validate_level(field: &str, value: &str) -> ConfigResult<()> {
    if !matches!(
        value.to_ascii_lowercase().as_str(),
        "off" | "error" | "warn" | "info" | "debug" | "trace"
    ) {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("unknown log level '{}'", value),
        });
    }
    Ok(())
}

pub(crate) fn validate_library_name(field: &str, value: &str) -> ConfigResult<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}

fn validate_name_len(field: &str, value: usize) -> ConfigResult<()> {
    if value == 0 || value > MAX_TYPE_NAME_LEN_LIMIT {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("must be between 1 and {}, got {}", MAX_TYPE_NAME_LEN_LIMIT, value),
        });
    }
    Ok(())
}
