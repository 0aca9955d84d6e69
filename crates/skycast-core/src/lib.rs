pub mod config;
pub mod error;

pub use config::{AutocompleteConfig, Config, EndpointConfig, ValidationResult};
pub use error::ConfigError;

/// Initialize logging for the application.
///
/// Honours `RUST_LOG`; falls back to `info`. Safe to call more than once.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();

    tracing::info!("SkyCast core initialized");
}
