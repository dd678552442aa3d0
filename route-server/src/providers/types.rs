//! Raw provider payloads.
//!
//! These types mirror the shapes routing providers hand back. They use
//! `Option` liberally because providers omit fields rather than sending
//! nulls, and none of them escape the normaliser: everything downstream
//! works on `RouteOption`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One route as returned by a provider, tagged by payload shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RawProviderRoute {
    /// Directions-style route: an array of legs with distance in metres and
    /// duration in seconds.
    Directions(DirectionsRoute),

    /// Transit itinerary with per-leg stop, line and timing detail.
    Itinerary(TransitItinerary),

    /// Aggregate-only answer with no leg breakdown.
    Summary(RouteSummary),
}

/// A directions-style route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectionsRoute {
    /// Short description, e.g. "I-95 N"
    pub summary: Option<String>,

    /// Route-level distance, used when no legs are given
    pub distance_meters: Option<f64>,

    /// Route-level duration, used when no legs are given
    pub duration_seconds: Option<f64>,

    pub start_location: Option<LatLng>,
    pub end_location: Option<LatLng>,

    #[serde(default)]
    pub legs: Vec<DirectionsLeg>,
}

/// One leg of a directions-style route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectionsLeg {
    /// "DRIVING", "WALKING", "BICYCLING" or "TRANSIT"
    pub travel_mode: Option<String>,
    pub distance_meters: Option<f64>,
    pub duration_seconds: Option<f64>,

    /// Present on transit legs
    pub transit: Option<DirectionsTransit>,
}

/// Transit block of a directions-style leg.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectionsTransit {
    pub line_name: Option<String>,
    pub line_short_name: Option<String>,

    /// e.g. "BUS", "SUBWAY", "HEAVY_RAIL", "TRAM", "FERRY"
    pub vehicle_type: Option<String>,
    pub agency_name: Option<String>,
    pub departure_stop: Option<String>,
    pub arrival_stop: Option<String>,
    pub departure_time: Option<DateTime<Utc>>,
    pub arrival_time: Option<DateTime<Utc>>,
    pub num_stops: Option<u32>,
}

/// A latitude/longitude pair as providers send it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// A public-transport itinerary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitItinerary {
    /// Whole-itinerary duration, used when no legs are given
    pub duration_seconds: Option<f64>,

    /// Whole-itinerary fare
    pub fare: Option<f64>,

    #[serde(default)]
    pub legs: Vec<ItineraryLeg>,
}

/// One leg of a transit itinerary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItineraryLeg {
    /// e.g. "WALK", "BUS", "RAIL", "SUBWAY", "TRAM", "FERRY", "BICYCLE"
    pub mode: Option<String>,
    pub distance_meters: Option<f64>,
    pub duration_seconds: Option<f64>,
    pub route_short_name: Option<String>,
    pub agency_name: Option<String>,
    pub from: Option<ItineraryPlace>,
    pub to: Option<ItineraryPlace>,

    /// Epoch milliseconds
    pub start_time: Option<i64>,

    /// Epoch milliseconds
    pub end_time: Option<i64>,
    pub intermediate_stops: Option<u32>,
    pub fare: Option<f64>,
}

/// A stop or place in an itinerary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItineraryPlace {
    pub name: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// Aggregate-only route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub distance_km: Option<f64>,
    pub duration_minutes: Option<f64>,

    /// Mode, if the provider states one
    pub mode: Option<String>,
}
