//! Transport mode type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::DomainError;

/// The way a single segment of a journey is travelled.
///
/// Providers describe modes with their own vocabularies ("DRIVING",
/// "HEAVY_RAIL", "BICYCLE", ...). Those are mapped onto this closed set by
/// [`TransportMode::from_provider_str`]; anything unrecognised is left to the
/// caller to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Car,
    Bus,
    Train,
    Subway,
    Tram,
    Ferry,
    Plane,
    Bike,
    Walk,
}

impl TransportMode {
    /// Every mode, in declaration order.
    pub const ALL: [TransportMode; 9] = [
        TransportMode::Car,
        TransportMode::Bus,
        TransportMode::Train,
        TransportMode::Subway,
        TransportMode::Tram,
        TransportMode::Ferry,
        TransportMode::Plane,
        TransportMode::Bike,
        TransportMode::Walk,
    ];

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Car => "car",
            TransportMode::Bus => "bus",
            TransportMode::Train => "train",
            TransportMode::Subway => "subway",
            TransportMode::Tram => "tram",
            TransportMode::Ferry => "ferry",
            TransportMode::Plane => "plane",
            TransportMode::Bike => "bike",
            TransportMode::Walk => "walk",
        }
    }

    /// Modes counted as low-emission when reporting how much of a journey
    /// avoids motor traffic.
    pub fn is_low_emission(&self) -> bool {
        matches!(
            self,
            TransportMode::Bike | TransportMode::Walk | TransportMode::Train | TransportMode::Subway
        )
    }

    /// Map a provider's mode string onto a mode.
    ///
    /// Matching is case-insensitive and treats `-` and spaces like `_`, so
    /// `"heavy rail"`, `"HEAVY_RAIL"` and `"Heavy-Rail"` are the same.
    /// Returns `None` for vocabulary we don't recognise.
    ///
    /// # Examples
    ///
    /// ```
    /// use route_server::domain::TransportMode;
    ///
    /// assert_eq!(TransportMode::from_provider_str("DRIVING"), Some(TransportMode::Car));
    /// assert_eq!(TransportMode::from_provider_str("heavy rail"), Some(TransportMode::Train));
    /// assert_eq!(TransportMode::from_provider_str("gondola"), None);
    /// ```
    pub fn from_provider_str(s: &str) -> Option<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                c => c.to_ascii_uppercase(),
            })
            .collect();

        let mode = match normalized.as_str() {
            "CAR" | "DRIVE" | "DRIVING" | "TAXI" => TransportMode::Car,
            "BUS" | "COACH" | "INTERCITY_BUS" | "TROLLEYBUS" => TransportMode::Bus,
            "TRAIN" | "RAIL" | "HEAVY_RAIL" | "COMMUTER_TRAIN" | "HIGH_SPEED_TRAIN"
            | "LONG_DISTANCE_TRAIN" | "INTERCITY" => TransportMode::Train,
            "SUBWAY" | "METRO" | "METRO_RAIL" | "UNDERGROUND" => TransportMode::Subway,
            "TRAM" | "LIGHT_RAIL" | "STREETCAR" | "MONORAIL" => TransportMode::Tram,
            "FERRY" | "BOAT" => TransportMode::Ferry,
            "PLANE" | "AIRPLANE" | "FLIGHT" | "AIR" => TransportMode::Plane,
            "BIKE" | "BICYCLE" | "BICYCLING" | "CYCLING" => TransportMode::Bike,
            "WALK" | "WALKING" | "FOOT" => TransportMode::Walk,
            _ => return None,
        };

        Some(mode)
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportMode {
    type Err = DomainError;

    /// Parse a canonical mode name (as produced by [`TransportMode::as_str`]).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        TransportMode::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| DomainError::UnknownMode(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_names_roundtrip() {
        for mode in TransportMode::ALL {
            assert_eq!(mode.as_str().parse::<TransportMode>().unwrap(), mode);
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("Train".parse::<TransportMode>().unwrap(), TransportMode::Train);
        assert_eq!(" WALK ".parse::<TransportMode>().unwrap(), TransportMode::Walk);
    }

    #[test]
    fn parse_rejects_unknown() {
        let err = "hovercraft".parse::<TransportMode>().unwrap_err();
        assert_eq!(err.to_string(), "unknown transport mode: hovercraft");
    }

    #[test]
    fn provider_vocabulary() {
        assert_eq!(TransportMode::from_provider_str("DRIVING"), Some(TransportMode::Car));
        assert_eq!(TransportMode::from_provider_str("BICYCLING"), Some(TransportMode::Bike));
        assert_eq!(TransportMode::from_provider_str("HEAVY_RAIL"), Some(TransportMode::Train));
        assert_eq!(TransportMode::from_provider_str("light-rail"), Some(TransportMode::Tram));
        assert_eq!(TransportMode::from_provider_str("Metro Rail"), Some(TransportMode::Subway));
        assert_eq!(TransportMode::from_provider_str("AIRPLANE"), Some(TransportMode::Plane));
        assert_eq!(TransportMode::from_provider_str("walking"), Some(TransportMode::Walk));
        assert_eq!(TransportMode::from_provider_str("CABLE_CAR"), None);
        assert_eq!(TransportMode::from_provider_str(""), None);
    }

    #[test]
    fn low_emission_set() {
        let low: Vec<_> = TransportMode::ALL
            .into_iter()
            .filter(TransportMode::is_low_emission)
            .collect();
        assert_eq!(
            low,
            vec![
                TransportMode::Train,
                TransportMode::Subway,
                TransportMode::Bike,
                TransportMode::Walk
            ]
        );
    }

    #[test]
    fn serde_uses_lowercase() {
        let json = serde_json::to_string(&TransportMode::Subway).unwrap();
        assert_eq!(json, "\"subway\"");
        let mode: TransportMode = serde_json::from_str("\"ferry\"").unwrap();
        assert_eq!(mode, TransportMode::Ferry);
    }
}
