//! Per-provider outcomes and the joined aggregate result

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

/// Identity of one upstream data provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Forecast,
    AirQuality,
    ReverseGeocode,
}

impl ProviderKind {
    /// Every provider the aggregation pipeline knows about
    pub const ALL: [ProviderKind; 3] = [
        ProviderKind::ReverseGeocode,
        ProviderKind::Forecast,
        ProviderKind::AirQuality,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Forecast => "forecast",
            ProviderKind::AirQuality => "air-quality",
            ProviderKind::ReverseGeocode => "reverse-geocode",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a single provider call did not produce a usable body
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderFailure {
    /// Upstream answered with a non-success status; the body was not parsed
    #[error("upstream returned HTTP {0}")]
    Status(u16),

    #[error("upstream did not answer within the configured timeout")]
    Timeout,

    #[error("upstream request failed: {0}")]
    Transport(String),

    #[error("upstream body is not valid JSON: {0}")]
    MalformedBody(String),
}

impl ProviderFailure {
    /// HTTP status reported by the upstream, if it answered at all
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderFailure::Status(code) => Some(*code),
            _ => None,
        }
    }

    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderFailure::Timeout
        } else if err.is_decode() {
            ProviderFailure::MalformedBody(err.to_string())
        } else if let Some(status) = err.status() {
            ProviderFailure::Status(status.as_u16())
        } else {
            ProviderFailure::Transport(err.to_string())
        }
    }
}

impl Serialize for ProviderFailure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ProviderFailure", 2)?;
        state.serialize_field("error", &self.to_string())?;
        state.serialize_field("status", &self.status())?;
        state.end()
    }
}

/// Result of one provider call within one request
///
/// Serializes to the raw upstream body on success and to
/// `{ "error": ..., "status": ... }` on failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProviderOutcome {
    Success(Value),
    Failure(ProviderFailure),
}

impl ProviderOutcome {
    #[must_use]
    pub fn body(&self) -> Option<&Value> {
        match self {
            ProviderOutcome::Success(body) => Some(body),
            ProviderOutcome::Failure(_) => None,
        }
    }
}

/// Joined outcomes of one request's fan-out, one slot per provider
///
/// A slot is `None` only when its provider was not part of the requested set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateResult {
    #[serde(rename = "localInfo")]
    pub location: Option<ProviderOutcome>,
    #[serde(rename = "previsao")]
    pub forecast: Option<ProviderOutcome>,
    #[serde(rename = "qualidadeDoAr")]
    pub air_quality: Option<ProviderOutcome>,
}

impl AggregateResult {
    #[must_use]
    pub fn outcome(&self, kind: ProviderKind) -> Option<&ProviderOutcome> {
        match kind {
            ProviderKind::ReverseGeocode => self.location.as_ref(),
            ProviderKind::Forecast => self.forecast.as_ref(),
            ProviderKind::AirQuality => self.air_quality.as_ref(),
        }
    }

    /// Successful body for a provider, `None` if it failed or was not requested
    #[must_use]
    pub fn body(&self, kind: ProviderKind) -> Option<&Value> {
        self.outcome(kind).and_then(ProviderOutcome::body)
    }

    #[must_use]
    pub fn is_success(&self, kind: ProviderKind) -> bool {
        self.body(kind).is_some()
    }

    /// True when no populated slot holds a success
    #[must_use]
    pub fn all_failed(&self) -> bool {
        !ProviderKind::ALL.iter().any(|kind| self.is_success(*kind))
    }
}
