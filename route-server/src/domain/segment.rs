//! Transport segment types.
//!
//! A `TransportSegment` is one leg of a route travelled by a single mode.
//! Its carbon and cost figures are derived from the emission model when the
//! segment is built and cannot be set by callers.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::emissions::EmissionModel;

use super::TransportMode;

/// Public-transport details attached to a segment, when the provider has them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransitDetails {
    /// Line identifier (e.g. "Northeast Regional", "M15")
    pub line: Option<String>,
    /// Vehicle type as reported by the provider
    pub vehicle_type: Option<String>,
    /// Operating agency
    pub agency: Option<String>,
    /// Stop where the traveller boards
    pub departure_stop: Option<String>,
    /// Stop where the traveller alights
    pub arrival_stop: Option<String>,
    pub departure_time: Option<DateTime<Utc>>,
    pub arrival_time: Option<DateTime<Utc>>,
    /// Number of stops travelled
    pub stop_count: Option<u32>,
    /// Fare quoted by the provider, informational only
    pub fare: Option<f64>,
}

/// One leg of a journey using a single transport mode.
///
/// # Invariants
///
/// - `duration_minutes`, `distance_km`, `carbon_kg` and `cost` are finite
///   and non-negative
/// - `carbon_kg` and `cost` are derived from the distance and mode
/// - A distance of zero yields exactly zero carbon and cost
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransportSegment {
    mode: TransportMode,
    duration_minutes: f64,
    distance_km: f64,
    carbon_kg: f64,
    cost: f64,
    estimated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    transit: Option<TransitDetails>,
}

impl TransportSegment {
    /// Build a segment, deriving its carbon and cost from `model`.
    ///
    /// Negative or non-finite durations and distances are replaced with zero
    /// and the segment is flagged as estimated. The same flag is set when
    /// the model had to fall back to a default factor for `mode`.
    ///
    /// # Examples
    ///
    /// ```
    /// use route_server::domain::{TransportMode, TransportSegment};
    /// use route_server::emissions::EmissionModel;
    ///
    /// let model = EmissionModel::default();
    /// let seg = TransportSegment::new(TransportMode::Walk, 12.0, 1.0, &model);
    /// assert_eq!(seg.carbon_kg(), 0.0);
    /// assert!(!seg.is_estimated());
    /// ```
    pub fn new(
        mode: TransportMode,
        duration_minutes: f64,
        distance_km: f64,
        model: &EmissionModel,
    ) -> Self {
        let (duration_minutes, bad_duration) = sanitize(duration_minutes);
        let (distance_km, bad_distance) = sanitize(distance_km);

        let carbon = model.segment_emission(mode, distance_km);
        let cost = model.segment_cost(mode, distance_km);

        Self {
            mode,
            duration_minutes,
            distance_km,
            carbon_kg: carbon.value,
            cost: cost.value,
            estimated: bad_duration || bad_distance || carbon.estimated || cost.estimated,
            transit: None,
        }
    }

    /// Attach public-transport details.
    pub fn with_transit(mut self, transit: TransitDetails) -> Self {
        self.transit = Some(transit);
        self
    }

    /// Flag this segment as built from incomplete provider data.
    pub fn mark_estimated(mut self) -> Self {
        self.estimated = true;
        self
    }

    pub fn mode(&self) -> TransportMode {
        self.mode
    }

    pub fn duration_minutes(&self) -> f64 {
        self.duration_minutes
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    /// Carbon emission in kg CO2-equivalent.
    pub fn carbon_kg(&self) -> f64 {
        self.carbon_kg
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Whether any figure on this segment was estimated rather than reported.
    pub fn is_estimated(&self) -> bool {
        self.estimated
    }

    pub fn transit(&self) -> Option<&TransitDetails> {
        self.transit.as_ref()
    }
}

/// Clamp a reported quantity to a finite, non-negative value.
/// Returns the value and whether it had to be replaced.
fn sanitize(value: f64) -> (f64, bool) {
    if value.is_finite() && value > 0.0 {
        (value, false)
    } else if value == 0.0 {
        // also folds -0.0 into 0.0
        (0.0, false)
    } else {
        (0.0, true)
    }
}
