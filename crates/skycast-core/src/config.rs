use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::error::ConfigError;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Open-Meteo endpoints and request settings
    #[serde(default)]
    pub endpoints: EndpointConfig,

    /// Suggestion behaviour while typing
    #[serde(default)]
    pub autocomplete: AutocompleteConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Base URL of the geocoding service (`/v1/search` is appended)
    pub geocoding_url: String,

    /// Base URL of the forecast service (`/v1/forecast` is appended)
    pub forecast_url: String,

    /// Language tag passed to the geocoding lookup
    pub language: String,

    /// Transport-level timeout applied to every request
    pub request_timeout_secs: u64,
}

impl EndpointConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            geocoding_url: "https://geocoding-api.open-meteo.com".to_string(),
            forecast_url: "https://api.open-meteo.com".to_string(),
            language: "en".to_string(),
            request_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AutocompleteConfig {
    /// Quiet interval after the last keystroke before a lookup is issued
    pub debounce_ms: u64,

    /// Minimum trimmed length (in characters) that triggers a lookup
    pub min_chars: usize,

    /// Number of candidates requested per lookup
    pub max_suggestions: usize,

    /// Keep a visible suggestion list when a lookup fails instead of hiding it
    pub keep_suggestions_on_error: bool,
}

impl AutocompleteConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 150,
            min_chars: 2,
            max_suggestions: 5,
            keep_suggestions_on_error: false,
        }
    }
}

impl Config {
    /// Load configuration from the platform config directory.
    ///
    /// A missing file or config directory is not an error: defaults are
    /// returned and nothing is written back.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_in(dirs::config_dir().as_deref())
    }

    fn load_in(config_dir: Option<&Path>) -> Result<Self, ConfigError> {
        match config_dir {
            Some(dir) => Self::load_from(&dir.join("skycast").join("config.toml")),
            None => {
                tracing::warn!("No platform config directory, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from an explicit path, falling back to defaults
    /// when the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration and validate it
    ///
    /// Warnings are logged; errors fail the load.
    pub fn load_validated() -> Result<(Self, ValidationResult), ConfigError> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()));
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(
            &self.endpoints.geocoding_url,
            "endpoints.geocoding_url",
            &mut result,
        );
        self.validate_url(
            &self.endpoints.forecast_url,
            "endpoints.forecast_url",
            &mut result,
        );

        if self.endpoints.language.trim().is_empty() {
            result.add_error("endpoints.language", "Language tag must not be empty");
        }

        if self.endpoints.request_timeout_secs == 0 {
            result.add_error(
                "endpoints.request_timeout_secs",
                "Request timeout must be greater than 0",
            );
        }

        if self.autocomplete.debounce_ms == 0 {
            result.add_warning(
                "autocomplete.debounce_ms",
                "Debounce disabled (0 ms): every keystroke issues a lookup",
            );
        } else if self.autocomplete.debounce_ms > 2000 {
            result.add_warning(
                "autocomplete.debounce_ms",
                "Debounce longer than 2 seconds will feel unresponsive",
            );
        }

        if self.autocomplete.max_suggestions == 0 {
            result.add_error(
                "autocomplete.max_suggestions",
                "At least one suggestion must be requested",
            );
        } else if self.autocomplete.max_suggestions > 100 {
            result.add_error(
                "autocomplete.max_suggestions",
                "The geocoding service returns at most 100 results",
            );
        }

        result
    }

    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }

                if url.port() == Some(0) {
                    result.add_error(field_name, "Port cannot be 0");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NoConfigDir)?
            .join("skycast");

        Ok(config_dir.join("config.toml"))
    }
}
