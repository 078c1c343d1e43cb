//! Coordinate model and validation of raw path segments

use crate::error::ValidationError;

const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);
const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);

/// A validated point on the globe
///
/// Only constructed through [`Coordinate::validate`] or [`Coordinate::new`], so a value
/// of this type is always finite and inside the geographic domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude in decimal degrees
    latitude: f64,
    /// Longitude in decimal degrees
    longitude: f64,
}

impl Coordinate {
    /// Create a coordinate from already parsed numbers
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        check_range("latitude", latitude, LATITUDE_RANGE)?;
        check_range("longitude", longitude, LONGITUDE_RANGE)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Parse and validate a raw latitude/longitude pair as received in a request path
    pub fn validate(raw_latitude: &str, raw_longitude: &str) -> Result<Self, ValidationError> {
        let latitude = parse_number("latitude", raw_latitude)?;
        let longitude = parse_number("longitude", raw_longitude)?;
        Self::new(latitude, longitude)
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Format coordinate as "lat, lon" for log lines
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

fn parse_number(field: &'static str, raw: &str) -> Result<f64, ValidationError> {
    let not_a_number = || ValidationError::NotANumber {
        field,
        raw: raw.to_string(),
    };

    let value = raw.trim().parse::<f64>().map_err(|_| not_a_number())?;
    // "NaN" and "inf" parse successfully but are not coordinates
    if !value.is_finite() {
        return Err(not_a_number());
    }
    Ok(value)
}

fn check_range(field: &'static str, value: f64, (min, max): (f64, f64)) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotANumber {
            field,
            raw: value.to_string(),
        });
    }
    if !(min..=max).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}
