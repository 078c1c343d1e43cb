//! Current conditions from the `OpenMeteo` forecast API

use reqwest::{Client, RequestBuilder};
use serde::Deserialize;

use super::{UpstreamProvider, lenient};
use crate::models::{Coordinate, ProviderKind};

/// Variables requested in the `current` block
pub const CURRENT_VARIABLES: &str =
    "temperature_2m,relative_humidity_2m,apparent_temperature,weather_code,wind_speed_10m";

pub struct ForecastProvider {
    base_url: String,
}

impl ForecastProvider {
    #[must_use]
    pub fn new(base_url: String) -> Self {
        Self { base_url }
    }

    fn url(&self, coordinate: &Coordinate) -> String {
        format!(
            "{}?latitude={}&longitude={}&current={}&timezone=auto",
            self.base_url,
            coordinate.latitude(),
            coordinate.longitude(),
            CURRENT_VARIABLES
        )
    }
}

impl UpstreamProvider for ForecastProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Forecast
    }

    fn request(&self, client: &Client, coordinate: &Coordinate) -> RequestBuilder {
        client.get(self.url(coordinate))
    }
}

/// Forecast response from `OpenMeteo`, reduced to what the summary reads
#[derive(Debug, Default, Deserialize)]
pub struct ForecastResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub current: Option<CurrentConditions>,
}

/// `current` block of the forecast response
///
/// Every field is optional: `OpenMeteo` omits variables it cannot compute for a location.
#[derive(Debug, Default, Deserialize)]
pub struct CurrentConditions {
    /// Air temperature at 2m in °C
    #[serde(default, deserialize_with = "lenient")]
    pub temperature_2m: Option<f64>,
    /// WMO weather interpretation code
    #[serde(default, deserialize_with = "lenient")]
    pub weather_code: Option<u16>,
    /// Wind speed at 10m in km/h
    #[serde(default, deserialize_with = "lenient")]
    pub wind_speed_10m: Option<f64>,
    /// Perceived temperature in °C
    #[serde(default, deserialize_with = "lenient")]
    pub apparent_temperature: Option<f64>,
    /// Relative humidity at 2m in %
    #[serde(default, deserialize_with = "lenient")]
    pub relative_humidity_2m: Option<f64>,
}
