//! Reduced response shape derived from a joined result

use serde::Serialize;

use crate::error::ProjectionError;
use crate::models::{AggregateResult, ProviderKind};
use crate::providers::forecast::ForecastResponse;
use crate::providers::parse_lenient;
use crate::providers::reverse_geocode::NominatimPlace;

/// Place and current conditions for one coordinate
///
/// Every leaf is optional; a field missing upstream is omitted from the output.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct SummaryView {
    #[serde(rename = "localInfo")]
    pub place: PlaceSummary,
    #[serde(rename = "previsao")]
    pub forecast: ForecastSummary,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct PlaceSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub address: AddressSummary,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct AddressSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ForecastSummary {
    pub current: CurrentSummary,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct CurrentSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_2m: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_speed_10m: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apparent_temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_humidity_2m: Option<f64>,
}

/// Project a joined result into the summary view
///
/// Requires successful reverse geocode and forecast outcomes. Air quality is not part of
/// the view, so its outcome is ignored.
pub fn project(result: &AggregateResult) -> Result<SummaryView, ProjectionError> {
    let place_body = result
        .body(ProviderKind::ReverseGeocode)
        .ok_or(ProjectionError::IncompleteSource(ProviderKind::ReverseGeocode))?;
    let forecast_body = result
        .body(ProviderKind::Forecast)
        .ok_or(ProjectionError::IncompleteSource(ProviderKind::Forecast))?;

    let place: NominatimPlace = parse_lenient(ProviderKind::ReverseGeocode, place_body);
    let forecast: ForecastResponse = parse_lenient(ProviderKind::Forecast, forecast_body);

    let address = place.address.unwrap_or_default();
    let current = forecast.current.unwrap_or_default();

    Ok(SummaryView {
        place: PlaceSummary {
            display_name: place.display_name,
            address: AddressSummary {
                city: address.settlement().map(str::to_string),
                state: address.state,
                country: address.country,
            },
        },
        forecast: ForecastSummary {
            current: CurrentSummary {
                temperature_2m: current.temperature_2m,
                weather_code: current.weather_code,
                wind_speed_10m: current.wind_speed_10m,
                apparent_temperature: current.apparent_temperature,
                relative_humidity_2m: current.relative_humidity_2m,
            },
        },
    })
}
