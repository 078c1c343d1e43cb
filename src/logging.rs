//! Tracing subscriber bootstrap.
//!
//! `RUST_LOG` takes precedence over the configured level when it is set.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::ClimaError;
use crate::config::LoggingConfig;

/// Install the global subscriber. Fails if one is already installed.
pub fn init(config: &LoggingConfig) -> Result<(), ClimaError> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| build_filter(&config.level))?;

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    result.map_err(|e| ClimaError::general(format!("Failed to initialize logging: {e}")))
}

fn build_filter(level: &str) -> Result<EnvFilter, ClimaError> {
    let directives = format!("{level},tower_http=debug,hyper=warn,reqwest=warn");
    EnvFilter::try_new(&directives)
        .map_err(|e| ClimaError::config(format!("Invalid log filter '{directives}': {e}")))
}
