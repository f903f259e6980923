//! Logging initialization for embedders
//!
//! The runtime only emits through the `log` facade. Hosts that have no
//! logger of their own can install `env_logger` here.

/// Logger could not be installed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoggingError {
    #[error("Unknown log level '{0}'")]
    InvalidLevel(String),
    #[error("A logger is already installed")]
    AlreadyInitialized,
}

/// Parse a configured level name ("off", "error", ... "trace")
pub fn parse_level(level: &str) -> Result<log::LevelFilter, LoggingError> {
    level
        .parse::<log::LevelFilter>()
        .map_err(|_| LoggingError::InvalidLevel(level.to_string()))
}

/// Install `env_logger`, honoring `RUST_LOG` and falling back to `default_level`
pub fn init(default_level: &str) -> Result<(), LoggingError> {
    let filter = parse_level(default_level)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter.to_string()))
        .format_timestamp_millis()
        .try_init()
        .map_err(|_| LoggingError::AlreadyInitialized)
}
