//! Configuration management for the clima service
//!
//! Handles loading configuration from an optional TOML file and environment
//! variables, and provides validation for all configuration settings.

use crate::ClimaError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_VAR: &str = "CLIMA_CONFIG";
/// Environment variable overriding the listening port
pub const PORT_VAR: &str = "PORT";

/// Root configuration structure for the clima service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClimaConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Upstream provider configuration
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listening port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory served for every path outside `/api`
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

/// Upstream provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,
    #[serde(default = "default_air_quality_url")]
    pub air_quality_url: String,
    #[serde(default = "default_reverse_geocode_url")]
    pub reverse_geocode_url: String,
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,
    /// Identification sent to the reverse geocoding service
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Timeout applied to every upstream request
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_port() -> u16 {
    3000
}

fn default_static_dir() -> String {
    "public".to_string()
}

fn default_forecast_url() -> String {
    "https://api.open-meteo.com/v1/forecast".to_string()
}

fn default_air_quality_url() -> String {
    "https://air-quality-api.open-meteo.com/v1/air-quality".to_string()
}

fn default_reverse_geocode_url() -> String {
    "https://nominatim.openstreetmap.org/reverse".to_string()
}

fn default_geocoding_url() -> String {
    "https://geocoding-api.open-meteo.com/v1/search".to_string()
}

fn default_user_agent() -> String {
    "ProjectClima-App/1.0".to_string()
}

fn default_timeout() -> u32 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            forecast_url: default_forecast_url(),
            air_quality_url: default_air_quality_url(),
            reverse_geocode_url: default_reverse_geocode_url(),
            geocoding_url: default_geocoding_url(),
            user_agent: default_user_agent(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl UpstreamConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }
}

impl ClimaConfig {
    /// Load configuration from file and process environment
    pub fn load() -> Result<Self> {
        let vars: config::Map<String, String> = std::env::vars().collect();
        Self::load_from(None, vars)
    }

    /// Load configuration from an explicit file path and a set of environment variables
    ///
    /// Precedence, lowest first: defaults, file, `CLIMA__SECTION__KEY` variables, `PORT`.
    pub fn load_from(config_path: Option<PathBuf>, vars: config::Map<String, String>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path
            .or_else(|| vars.get(CONFIG_PATH_VAR).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("clima.toml"));

        builder = builder.add_source(
            File::from(config_file)
                .required(false)
                .format(config::FileFormat::Toml),
        );

        let port = vars
            .get(PORT_VAR)
            .map(|raw| {
                raw.trim()
                    .parse::<u16>()
                    .map_err(|_| ClimaError::config(format!("{PORT_VAR} must be a port number, got '{raw}'")))
            })
            .transpose()?;

        // Environment variable overrides with CLIMA__ prefix
        builder = builder
            .add_source(
                Environment::with_prefix("CLIMA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(vars)),
            )
            .set_override_option("server.port", port.map(i64::from))
            .with_context(|| "Failed to apply PORT override")?;

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: ClimaConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // Apply defaults for missing values
        config.apply_defaults();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Apply default values to empty or zero configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.port == 0 {
            self.server.port = default_port();
        }
        if self.server.static_dir.is_empty() {
            self.server.static_dir = default_static_dir();
        }
        if self.upstream.forecast_url.is_empty() {
            self.upstream.forecast_url = default_forecast_url();
        }
        if self.upstream.air_quality_url.is_empty() {
            self.upstream.air_quality_url = default_air_quality_url();
        }
        if self.upstream.reverse_geocode_url.is_empty() {
            self.upstream.reverse_geocode_url = default_reverse_geocode_url();
        }
        if self.upstream.geocoding_url.is_empty() {
            self.upstream.geocoding_url = default_geocoding_url();
        }
        if self.upstream.timeout_seconds == 0 {
            self.upstream.timeout_seconds = default_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_upstream()?;
        self.validate_logging()?;
        Ok(())
    }

    fn validate_upstream(&self) -> Result<()> {
        if self.upstream.timeout_seconds > 300 {
            return Err(ClimaError::config("Upstream timeout cannot exceed 300 seconds").into());
        }

        if self.upstream.user_agent.trim().is_empty() {
            return Err(ClimaError::config(
                "Upstream user agent cannot be empty; the reverse geocoding service requires one",
            )
            .into());
        }

        let urls = [
            ("forecast_url", &self.upstream.forecast_url),
            ("air_quality_url", &self.upstream.air_quality_url),
            ("reverse_geocode_url", &self.upstream.reverse_geocode_url),
            ("geocoding_url", &self.upstream.geocoding_url),
        ];
        for (name, url) in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ClimaError::config(format!(
                    "upstream.{name} must be a valid HTTP or HTTPS URL, got '{url}'"
                ))
                .into());
            }
        }

        Ok(())
    }

    fn validate_logging(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(ClimaError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(ClimaError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }
}
