//! Reverse geocoding: coordinates to a place name and address breakdown.
//! Uses Nominatim (OpenStreetMap), whose usage policy requires an identifying User-Agent.

use reqwest::header::USER_AGENT;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;

use super::{UpstreamProvider, lenient};
use crate::models::{Coordinate, ProviderKind};

pub struct ReverseGeocodeProvider {
    base_url: String,
    user_agent: String,
}

impl ReverseGeocodeProvider {
    #[must_use]
    pub fn new(base_url: String, user_agent: String) -> Self {
        Self {
            base_url,
            user_agent,
        }
    }

    fn url(&self, coordinate: &Coordinate) -> String {
        format!(
            "{}?lat={}&lon={}&format=json",
            self.base_url,
            coordinate.latitude(),
            coordinate.longitude()
        )
    }
}

impl UpstreamProvider for ReverseGeocodeProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::ReverseGeocode
    }

    fn request(&self, client: &Client, coordinate: &Coordinate) -> RequestBuilder {
        client
            .get(self.url(coordinate))
            .header(USER_AGENT, self.user_agent.as_str())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct NominatimPlace {
    #[serde(default, deserialize_with = "lenient")]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub address: Option<NominatimAddress>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NominatimAddress {
    #[serde(default, deserialize_with = "lenient")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub town: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub village: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub municipality: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub country: Option<String>,
}

impl NominatimAddress {
    /// Prefer city > town > village > municipality for the settlement name
    #[must_use]
    pub fn settlement(&self) -> Option<&str> {
        self.city
            .as_deref()
            .or(self.town.as_deref())
            .or(self.village.as_deref())
            .or(self.municipality.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_sends_identification_header() {
        let provider = ReverseGeocodeProvider::new(
            "https://nominatim.openstreetmap.org/reverse".to_string(),
            "ProjectClima-App/1.0".to_string(),
        );
        let request = provider
            .request(&Client::new(), &Coordinate::new(-22.9, -43.2).unwrap())
            .build()
            .unwrap();

        assert_eq!(
            request.url().as_str(),
            "https://nominatim.openstreetmap.org/reverse?lat=-22.9&lon=-43.2&format=json"
        );
        assert_eq!(request.headers()[USER_AGENT], "ProjectClima-App/1.0");
    }

    #[test]
    fn test_settlement_fallback() {
        let place: NominatimPlace = serde_json::from_value(json!({
            "display_name": "Paraty, Rio de Janeiro, Brasil",
            "address": {"town": "Paraty", "state": "Rio de Janeiro", "country": "Brasil"}
        }))
        .unwrap();
        let address = place.address.unwrap();
        assert_eq!(address.settlement(), Some("Paraty"));

        let city_wins = NominatimAddress {
            city: Some("São Paulo".to_string()),
            town: Some("Other".to_string()),
            ..NominatimAddress::default()
        };
        assert_eq!(city_wins.settlement(), Some("São Paulo"));
        assert_eq!(NominatimAddress::default().settlement(), None);
    }

    #[test]
    fn test_mistyped_address_field_is_dropped_alone() {
        let place: NominatimPlace = serde_json::from_value(json!({
            "display_name": 42,
            "address": {"city": ["Recife"], "town": "Olinda", "country": "Brasil"}
        }))
        .unwrap();
        assert_eq!(place.display_name, None);
        let address = place.address.unwrap();
        assert_eq!(address.city, None);
        assert_eq!(address.settlement(), Some("Olinda"));
        assert_eq!(address.country.as_deref(), Some("Brasil"));
    }
}
