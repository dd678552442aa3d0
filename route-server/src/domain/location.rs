//! Location types.

use serde::Serialize;

use super::DomainError;

/// A WGS84 coordinate pair.
///
/// Latitude is within [-90, 90] and longitude within [-180, 180]; this is
/// checked at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    lat: f64,
    lng: f64,
}

impl Coordinates {
    /// Create a coordinate pair, rejecting out-of-range or non-finite values.
    pub fn new(lat: f64, lng: f64) -> Result<Self, DomainError> {
        let valid = lat.is_finite()
            && lng.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lng);

        if !valid {
            return Err(DomainError::InvalidCoordinates { lat, lng });
        }

        Ok(Self { lat, lng })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }
}

/// A place a route starts or ends at.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    address: String,
    coordinates: Option<Coordinates>,
}

impl Location {
    /// A location known only by its address.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            coordinates: None,
        }
    }

    /// A location with known coordinates.
    pub fn with_coordinates(address: impl Into<String>, coordinates: Coordinates) -> Self {
        Self {
            address: address.into(),
            coordinates: Some(coordinates),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates
    }
}
