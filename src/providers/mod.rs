//! Upstream data providers
//!
//! Every provider issues exactly one GET per request and turns whatever happens
//! into a [`ProviderOutcome`]. Errors never leave [`fetch`].

use std::time::Instant;

use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::{DeserializeOwned, Deserializer};
use serde_json::Value;
use tracing::{debug, warn};

use crate::models::{Coordinate, ProviderFailure, ProviderKind, ProviderOutcome};

pub mod air_quality;
pub mod forecast;
pub mod reverse_geocode;

pub use air_quality::AirQualityProvider;
pub use forecast::ForecastProvider;
pub use reverse_geocode::ReverseGeocodeProvider;

/// One upstream data source keyed by coordinates
pub trait UpstreamProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Build the provider specific request (URL, query parameters, headers)
    fn request(&self, client: &Client, coordinate: &Coordinate) -> RequestBuilder;
}

/// Send the provider's request and classify the result
#[tracing::instrument(
    name = "fetch_provider",
    skip(client, provider, coordinate),
    fields(provider = %provider.kind(), coordinate = %coordinate.format_coordinates())
)]
pub async fn fetch(client: &Client, provider: &dyn UpstreamProvider, coordinate: &Coordinate) -> ProviderOutcome {
    let start_time = Instant::now();
    let outcome = send(client, provider, coordinate).await;
    let elapsed = start_time.elapsed().as_secs_f64();

    match &outcome {
        ProviderOutcome::Success(_) => {
            debug!("{} answered in {:.3}s", provider.kind(), elapsed)
        }
        ProviderOutcome::Failure(failure) => {
            warn!("{} failed after {:.3}s: {}", provider.kind(), elapsed, failure)
        }
    }
    outcome
}

async fn send(client: &Client, provider: &dyn UpstreamProvider, coordinate: &Coordinate) -> ProviderOutcome {
    let response = match provider.request(client, coordinate).send().await {
        Ok(response) => response,
        Err(e) => return ProviderOutcome::Failure(ProviderFailure::from_reqwest(&e)),
    };

    let status = response.status();
    if !status.is_success() {
        // Non-OK is terminal for this provider, the body is never parsed
        return ProviderOutcome::Failure(ProviderFailure::Status(status.as_u16()));
    }

    let bytes = match response.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => return ProviderOutcome::Failure(ProviderFailure::from_reqwest(&e)),
    };

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(body) => ProviderOutcome::Success(body),
        Err(e) => ProviderOutcome::Failure(ProviderFailure::MalformedBody(e.to_string())),
    }
}

/// Read a successful body into a typed view whose fields are all optional
///
/// A body of an unexpected shape yields the empty view instead of an error.
pub fn parse_lenient<T: DeserializeOwned + Default>(kind: ProviderKind, body: &Value) -> T {
    serde_json::from_value::<T>(body.clone()).unwrap_or_else(|e| {
        debug!("{} body does not match the expected shape: {}", kind, e);
        T::default()
    })
}

/// Field-level counterpart of [`parse_lenient`] for `Option` fields of the typed views
///
/// A value of the wrong type becomes `None` and leaves the sibling fields intact.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// The three coordinate keyed providers, built once from configuration
pub struct ProviderSet {
    pub reverse_geocode: ReverseGeocodeProvider,
    pub forecast: ForecastProvider,
    pub air_quality: AirQualityProvider,
}

impl ProviderSet {
    #[must_use]
    pub fn get(&self, kind: ProviderKind) -> &dyn UpstreamProvider {
        match kind {
            ProviderKind::ReverseGeocode => &self.reverse_geocode,
            ProviderKind::Forecast => &self.forecast,
            ProviderKind::AirQuality => &self.air_quality,
        }
    }
}

impl From<&crate::config::UpstreamConfig> for ProviderSet {
    fn from(config: &crate::config::UpstreamConfig) -> Self {
        Self {
            reverse_geocode: ReverseGeocodeProvider::new(
                config.reverse_geocode_url.clone(),
                config.user_agent.clone(),
            ),
            forecast: ForecastProvider::new(config.forecast_url.clone()),
            air_quality: AirQualityProvider::new(config.air_quality_url.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn coordinate() -> Coordinate {
        Coordinate::new(-23.55, -46.63).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_success_returns_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"current": {}})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = ForecastProvider::new(format!("{}/v1/forecast", mock_server.uri()));
        let outcome = fetch(&Client::new(), &provider, &coordinate()).await;
        assert_eq!(outcome, ProviderOutcome::Success(json!({"current": {}})));
    }

    #[tokio::test]
    async fn test_non_ok_status_is_not_parsed() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("<html>down</html>"))
            .mount(&mock_server)
            .await;

        let provider = AirQualityProvider::new(mock_server.uri());
        let outcome = fetch(&Client::new(), &provider, &coordinate()).await;
        assert_eq!(outcome, ProviderOutcome::Failure(ProviderFailure::Status(503)));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let provider = ForecastProvider::new(mock_server.uri());
        let outcome = fetch(&Client::new(), &provider, &coordinate()).await;
        assert!(matches!(
            outcome,
            ProviderOutcome::Failure(ProviderFailure::MalformedBody(_))
        ));
    }

    #[tokio::test]
    async fn test_timeout_is_classified() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&mock_server)
            .await;

        let client = Client::builder()
            .timeout(Duration::from_millis(50))
            .build()
            .unwrap();
        let provider = ForecastProvider::new(mock_server.uri());
        let outcome = fetch(&client, &provider, &coordinate()).await;
        assert_eq!(outcome, ProviderOutcome::Failure(ProviderFailure::Timeout));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_failure() {
        // Port 9 (discard) on localhost is not listening in test environments
        let provider = ForecastProvider::new("http://127.0.0.1:9/v1/forecast".to_string());
        let outcome = fetch(&Client::new(), &provider, &coordinate()).await;
        assert!(matches!(
            outcome,
            ProviderOutcome::Failure(ProviderFailure::Transport(_))
        ));
    }

    #[test]
    fn test_parse_lenient_falls_back_to_empty_view() {
        let parsed: forecast::ForecastResponse =
            parse_lenient(ProviderKind::Forecast, &json!({"current": {"temperature_2m": 19.5}}));
        assert_eq!(parsed.current.unwrap().temperature_2m, Some(19.5));

        let parsed: forecast::ForecastResponse = parse_lenient(ProviderKind::Forecast, &json!([1, 2]));
        assert!(parsed.current.is_none());
    }

    #[test]
    fn test_mistyped_field_keeps_its_siblings() {
        let parsed: forecast::ForecastResponse = parse_lenient(
            ProviderKind::Forecast,
            &json!({"current": {"temperature_2m": 27.3, "wind_speed_10m": 9.4, "weather_code": 2.5}}),
        );
        let current = parsed.current.unwrap();
        assert_eq!(current.temperature_2m, Some(27.3));
        assert_eq!(current.wind_speed_10m, Some(9.4));
        assert_eq!(current.weather_code, None);

        let parsed: forecast::ForecastResponse =
            parse_lenient(ProviderKind::Forecast, &json!({"current": "unavailable", "latitude": 1.0}));
        assert!(parsed.current.is_none());
    }

    #[test]
    fn test_provider_set_dispatch() {
        let set = ProviderSet::from(&crate::config::UpstreamConfig::default());
        for kind in ProviderKind::ALL {
            assert_eq!(set.get(kind).kind(), kind);
        }
    }
}
