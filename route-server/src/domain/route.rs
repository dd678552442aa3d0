//! Route option types.
//!
//! A `RouteOption` is one candidate itinerary from origin to destination.
//! Its totals are always the sums of its segments' figures; there is no way
//! to set them independently.

use serde::Serialize;
use uuid::Uuid;

use super::{DomainError, Location, TransportMode, TransportSegment};

/// Highest possible sustainability score.
pub const MAX_SCORE: u8 = 100;

/// A candidate itinerary.
///
/// # Invariants
///
/// - At least one segment, kept in travel order
/// - `total_*` fields equal the sum of the corresponding segment fields
/// - `sustainability_score` is within [0, 100]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteOption {
    id: String,
    provider: String,
    origin: Location,
    destination: Location,
    segments: Vec<TransportSegment>,
    total_duration_minutes: f64,
    total_distance_km: f64,
    total_cost: f64,
    total_carbon_kg: f64,
    sustainability_score: u8,
}

impl RouteOption {
    /// Assemble a route from its segments with a freshly generated id.
    ///
    /// The score starts at zero; the planner assigns it once the route is
    /// scored.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `segments` is empty.
    pub fn new(
        provider: impl Into<String>,
        origin: Location,
        destination: Location,
        segments: Vec<TransportSegment>,
    ) -> Result<Self, DomainError> {
        if segments.is_empty() {
            return Err(DomainError::EmptyRoute);
        }

        let total_duration_minutes = segments.iter().map(|s| s.duration_minutes()).sum();
        let total_distance_km = segments.iter().map(|s| s.distance_km()).sum();
        let total_cost = segments.iter().map(|s| s.cost()).sum();
        let total_carbon_kg = segments.iter().map(|s| s.carbon_kg()).sum();

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            provider: provider.into(),
            origin,
            destination,
            segments,
            total_duration_minutes,
            total_distance_km,
            total_cost,
            total_carbon_kg,
            sustainability_score: 0,
        })
    }

    /// Set the sustainability score, clamped to [0, 100].
    pub(crate) fn with_score(mut self, score: u8) -> Self {
        self.sustainability_score = score.min(MAX_SCORE);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Name of the provider this route came from.
    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn origin(&self) -> &Location {
        &self.origin
    }

    pub fn destination(&self) -> &Location {
        &self.destination
    }

    pub fn segments(&self) -> &[TransportSegment] {
        &self.segments
    }

    pub fn total_duration_minutes(&self) -> f64 {
        self.total_duration_minutes
    }

    pub fn total_distance_km(&self) -> f64 {
        self.total_distance_km
    }

    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    /// Total carbon footprint in kg CO2-equivalent.
    pub fn total_carbon_kg(&self) -> f64 {
        self.total_carbon_kg
    }

    pub fn sustainability_score(&self) -> u8 {
        self.sustainability_score
    }

    /// Whether any segment carries estimated figures.
    pub fn is_estimated(&self) -> bool {
        self.segments.iter().any(|s| s.is_estimated())
    }

    /// Modes used, in travel order, with consecutive repeats collapsed.
    pub fn modes(&self) -> Vec<TransportMode> {
        let mut modes: Vec<TransportMode> = self.segments.iter().map(|s| s.mode()).collect();
        modes.dedup();
        modes
    }

    /// Human-readable mode summary, e.g. "walk + train + walk".
    pub fn mode_summary(&self) -> String {
        self.modes()
            .iter()
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(" + ")
    }

    /// Fraction of the distance travelled on low-emission modes, in [0, 1].
    pub fn low_emission_share(&self) -> f64 {
        if self.total_distance_km <= 0.0 {
            return 0.0;
        }
        let low: f64 = self
            .segments
            .iter()
            .filter(|s| s.mode().is_low_emission())
            .map(|s| s.distance_km())
            .sum();
        (low / self.total_distance_km).clamp(0.0, 1.0)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::emissions::EmissionModel;
    use proptest::prelude::*;

    fn segment_strategy() -> impl Strategy<Value = TransportSegment> {
        (
            prop::sample::select(TransportMode::ALL.to_vec()),
            0.0f64..600.0,
            0.0f64..1000.0,
        )
            .prop_map(|(mode, mins, km)| {
                TransportSegment::new(mode, mins, km, &EmissionModel::default())
            })
    }

    proptest! {
        /// Property: totals always equal the sum over segments.
        #[test]
        fn aggregate_consistency(segments in prop::collection::vec(segment_strategy(), 1..8)) {
            let r = RouteOption::new("p", Location::new("A"), Location::new("B"), segments).unwrap();

            let carbon: f64 = r.segments().iter().map(|s| s.carbon_kg()).sum();
            let distance: f64 = r.segments().iter().map(|s| s.distance_km()).sum();
            let duration: f64 = r.segments().iter().map(|s| s.duration_minutes()).sum();
            let cost: f64 = r.segments().iter().map(|s| s.cost()).sum();

            prop_assert_eq!(r.total_carbon_kg(), carbon);
            prop_assert_eq!(r.total_distance_km(), distance);
            prop_assert_eq!(r.total_duration_minutes(), duration);
            prop_assert_eq!(r.total_cost(), cost);
        }
    }
}
