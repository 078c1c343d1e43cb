//! Advisory completeness checks on a joined result.
//!
//! Warnings are logged and handed back to the caller; they never change a response.

use serde_json::Value;
use tracing::warn;

use crate::models::{AggregateResult, ProviderKind};
use crate::providers::air_quality::{AirQualityResponse, HourlyIndices};
use crate::providers::parse_lenient;

pub const US_AQI_MISSING: &str = "air-quality US AQI missing";
pub const EUROPEAN_AQI_MISSING: &str = "air-quality European AQI missing";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QualityReport {
    pub warnings: Vec<String>,
}

impl QualityReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    fn warn(&mut self, message: &str) {
        warn!(quality = message, "Incomplete upstream data");
        self.warnings.push(message.to_string());
    }
}

/// Inspect a joined result for missing expected fields
///
/// Only successful outcomes are inspected; a failed provider is already reported
/// through its slot.
#[must_use]
pub fn check(result: &AggregateResult) -> QualityReport {
    let mut report = QualityReport::default();

    if let Some(body) = result.body(ProviderKind::AirQuality) {
        check_air_quality(body, &mut report);
    }

    report
}

fn check_air_quality(body: &Value, report: &mut QualityReport) {
    let response = parse_lenient::<AirQualityResponse>(ProviderKind::AirQuality, body);
    let hourly = response.hourly.unwrap_or_default();

    if !HourlyIndices::has_values(hourly.us_aqi.as_ref()) {
        report.warn(US_AQI_MISSING);
    }
    if !HourlyIndices::has_values(hourly.european_aqi.as_ref()) {
        report.warn(EUROPEAN_AQI_MISSING);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProviderFailure, ProviderOutcome};
    use serde_json::json;

    fn with_air_quality(outcome: ProviderOutcome) -> AggregateResult {
        AggregateResult {
            air_quality: Some(outcome),
            ..AggregateResult::default()
        }
    }

    #[test]
    fn test_complete_air_quality_is_clean() {
        let result = with_air_quality(ProviderOutcome::Success(json!({
            "hourly": {"time": ["t0"], "us_aqi": [35], "european_aqi": [20]}
        })));
        assert!(check(&result).is_clean());
    }

    #[test]
    fn test_each_missing_metric_adds_one_warning() {
        let result = with_air_quality(ProviderOutcome::Success(json!({
            "hourly": {"time": ["t0"], "european_aqi": [20]}
        })));
        assert_eq!(check(&result).warnings, vec![US_AQI_MISSING.to_string()]);

        let result = with_air_quality(ProviderOutcome::Success(json!({"hourly": {}})));
        assert_eq!(
            check(&result).warnings,
            vec![US_AQI_MISSING.to_string(), EUROPEAN_AQI_MISSING.to_string()]
        );
    }

    #[test]
    fn test_all_null_series_counts_as_missing() {
        let result = with_air_quality(ProviderOutcome::Success(json!({
            "hourly": {"us_aqi": [null, null], "european_aqi": [12]}
        })));
        assert_eq!(check(&result).warnings, vec![US_AQI_MISSING.to_string()]);
    }

    #[test]
    fn test_unexpected_shape_reports_both_metrics() {
        let result = with_air_quality(ProviderOutcome::Success(json!({"hourly": "n/a"})));
        assert_eq!(check(&result).warnings.len(), 2);
    }

    #[test]
    fn test_unrelated_mistyped_field_does_not_raise_warnings() {
        let result = with_air_quality(ProviderOutcome::Success(json!({
            "hourly": {"time": "2024-06-01", "us_aqi": [35], "european_aqi": [20]}
        })));
        assert!(check(&result).is_clean());
    }

    #[test]
    fn test_failed_or_absent_air_quality_is_not_inspected() {
        let failed = with_air_quality(ProviderOutcome::Failure(ProviderFailure::Status(503)));
        assert!(check(&failed).is_clean());
        assert!(check(&AggregateResult::default()).is_clean());
    }

    #[test]
    fn test_forecast_fields_are_not_checked() {
        let result = AggregateResult {
            forecast: Some(ProviderOutcome::Success(json!({}))),
            ..AggregateResult::default()
        };
        assert!(check(&result).is_clean());
    }
}
