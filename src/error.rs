//! Error types and handling for the clima service

use thiserror::Error;

use crate::models::ProviderKind;

/// Application level error for startup and configuration
#[derive(Error, Debug)]
pub enum ClimaError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl ClimaError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }
}

/// Rejection of a raw coordinate pair before any upstream call is made
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} is not a number: '{raw}'")]
    NotANumber { field: &'static str, raw: String },

    #[error("{field} {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// The summary view could not be derived from the joined result
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProjectionError {
    #[error("cannot build summary: {0} data is unavailable")]
    IncompleteSource(ProviderKind),
}

/// Forward geocoding failed before a match list could be read
#[derive(Error, Debug)]
pub enum GeocodeError {
    #[error("geocoding upstream returned HTTP {0}")]
    Status(u16),

    #[error("geocoding request failed: {0}")]
    Transport(#[from] reqwest::Error),
}
