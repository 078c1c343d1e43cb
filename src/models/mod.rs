//! Data models for the clima aggregation pipeline
//!
//! - Coordinate: validated latitude/longitude pair
//! - Outcome: per-provider results and the joined aggregate

pub mod coordinate;
pub mod outcome;

// Re-export all public types for convenient access
pub use coordinate::Coordinate;
pub use outcome::{AggregateResult, ProviderFailure, ProviderKind, ProviderOutcome};
