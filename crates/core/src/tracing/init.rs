//! Initialization functions for tracing

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{CoreError, CoreResult};
use crate::tracing::config::InstrumentationConfig;

/// Initialize tracing with the given configuration
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed
pub fn init_tracing(config: &InstrumentationConfig) -> CoreResult<()> {
    // RUST_LOG wins over the configured level
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if config.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()
    };

    result.map_err(|e| CoreError::invalid_config(format!("tracing already initialized: {e}")))?;

    tracing::debug!(service = %config.service_name, "Tracing initialized");
    Ok(())
}

/// Initialize with default configuration from environment
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed
pub fn init_default() -> CoreResult<()> {
    init_tracing(&InstrumentationConfig::from_env())
}
