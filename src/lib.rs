//! `Clima` - weather, air quality and place name lookup for a pair of coordinates
//!
//! This library validates coordinates, fans out to the upstream providers concurrently,
//! joins their outcomes and serves the result over HTTP.

pub mod aggregator;
pub mod api;
pub mod config;
pub mod error;
pub mod geocoding;
pub mod logging;
pub mod models;
pub mod providers;
pub mod quality;
pub mod summary;
pub mod web;

// Re-export core types for public API
pub use aggregator::Aggregator;
pub use config::ClimaConfig;
pub use error::{ClimaError, GeocodeError, ProjectionError, ValidationError};
pub use geocoding::CityGeocoder;
pub use models::{AggregateResult, Coordinate, ProviderFailure, ProviderKind, ProviderOutcome};
pub use quality::QualityReport;
pub use summary::SummaryView;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
