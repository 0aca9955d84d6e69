//! Configuration error types.
//!
//! Weather and lookup failures live in `skycast-weather`; this module only
//! covers what can go wrong before any network work starts.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while locating, reading or checking the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine the platform configuration directory")]
    NoConfigDir,

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
