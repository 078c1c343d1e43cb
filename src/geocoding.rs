//! Forward geocoding of a free-text place name through the `OpenMeteo` geocoding API

use std::time::Instant;

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::error::GeocodeError;

/// Geocoding response from `OpenMeteo`; `results` is absent when nothing matched
#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Option<Vec<Value>>,
}

pub struct CityGeocoder {
    client: Client,
    base_url: String,
}

impl CityGeocoder {
    #[must_use]
    pub fn new(client: Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    fn url(&self, city_name: &str) -> String {
        format!(
            "{}?name={}&count=1&format=json",
            self.base_url,
            urlencoding::encode(city_name)
        )
    }

    /// First match for a place name, returned verbatim
    #[instrument(skip(self))]
    pub async fn lookup(&self, city_name: &str) -> Result<Option<Value>, GeocodeError> {
        info!("Geocoding location: '{}'", city_name);
        let start_time = Instant::now();

        let response = self.client.get(self.url(city_name)).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("Geocoding upstream returned {}", status);
            return Err(GeocodeError::Status(status.as_u16()));
        }

        let response: GeocodingResponse = response.json().await?;
        let first = response.results.and_then(|results| results.into_iter().next());

        match &first {
            Some(_) => debug!(
                "Found a match for '{}' in {:.3}s",
                city_name,
                start_time.elapsed().as_secs_f64()
            ),
            None => warn!("No results found for location '{}'", city_name),
        }

        Ok(first)
    }
}
