//! Hourly air quality indices from the `OpenMeteo` air quality API

use reqwest::{Client, RequestBuilder};
use serde::Deserialize;

use super::{UpstreamProvider, lenient};
use crate::models::{Coordinate, ProviderKind};

pub const HOURLY_VARIABLES: &str = "us_aqi,european_aqi";

pub struct AirQualityProvider {
    base_url: String,
}

impl AirQualityProvider {
    #[must_use]
    pub fn new(base_url: String) -> Self {
        Self { base_url }
    }

    fn url(&self, coordinate: &Coordinate) -> String {
        format!(
            "{}?latitude={}&longitude={}&hourly={}&timezone=auto",
            self.base_url,
            coordinate.latitude(),
            coordinate.longitude(),
            HOURLY_VARIABLES
        )
    }
}

impl UpstreamProvider for AirQualityProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::AirQuality
    }

    fn request(&self, client: &Client, coordinate: &Coordinate) -> RequestBuilder {
        client.get(self.url(coordinate))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AirQualityResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub hourly: Option<HourlyIndices>,
}

/// Hourly index series; entries are `null` for hours the model has not covered yet
#[derive(Debug, Default, Deserialize)]
pub struct HourlyIndices {
    #[serde(default, deserialize_with = "lenient")]
    pub us_aqi: Option<Vec<Option<f64>>>,
    #[serde(default, deserialize_with = "lenient")]
    pub european_aqi: Option<Vec<Option<f64>>>,
}

impl HourlyIndices {
    /// A series counts as present when at least one hour carries a value
    #[must_use]
    pub fn has_values(series: Option<&Vec<Option<f64>>>) -> bool {
        series.is_some_and(|values| values.iter().any(Option::is_some))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_url_requests_both_indices() {
        let provider =
            AirQualityProvider::new("https://air-quality-api.open-meteo.com/v1/air-quality".to_string());
        let url = provider.url(&Coordinate::new(48.0, 2.5).unwrap());
        assert!(url.starts_with("https://air-quality-api.open-meteo.com/v1/air-quality?latitude=48&longitude=2.5"));
        assert!(url.contains("hourly=us_aqi,european_aqi"));
    }

    #[test]
    fn test_null_entries_are_tolerated() {
        let response: AirQualityResponse = serde_json::from_value(json!({
            "hourly": {
                "time": ["2024-05-01T00:00", "2024-05-01T01:00"],
                "us_aqi": [null, 42],
                "european_aqi": [null, null]
            }
        }))
        .unwrap();
        let hourly = response.hourly.unwrap();
        assert!(HourlyIndices::has_values(hourly.us_aqi.as_ref()));
        assert!(!HourlyIndices::has_values(hourly.european_aqi.as_ref()));
    }

    #[test]
    fn test_missing_series() {
        let response: AirQualityResponse =
            serde_json::from_value(json!({"hourly": {"time": []}})).unwrap();
        let hourly = response.hourly.unwrap();
        assert!(!HourlyIndices::has_values(hourly.us_aqi.as_ref()));
    }

    #[test]
    fn test_mistyped_series_does_not_hide_the_other() {
        let response: AirQualityResponse = serde_json::from_value(json!({
            "hourly": {"time": 17, "us_aqi": "n/a", "european_aqi": [null, 12]}
        }))
        .unwrap();
        let hourly = response.hourly.unwrap();
        assert!(hourly.us_aqi.is_none());
        assert!(HourlyIndices::has_values(hourly.european_aqi.as_ref()));
    }
}
