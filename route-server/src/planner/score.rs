//! Sustainability scoring.
//!
//! A route's score comes from its emission intensity (kg CO2e per km)
//! measured against a worst-case reference (the car factor) and a best case
//! of zero. The linear base score is topped up by a small bonus for the
//! share of the trip that is clean relative to driving, then clamped and
//! rounded to an integer in [0, 100].
//!
//! The bonus is derived from intensity, not from which modes carried the
//! distance, so that a route with strictly lower emissions over the same
//! distance can never score lower. Mode composition is reported separately
//! in the insights.
//!
//! A bonus for distance on bike, walk, train or subway would let train
//! (0.041 kg/km) outscore tram (0.029 kg/km), so mode membership is not used.

use crate::domain::{MAX_SCORE, RouteOption, TransportSegment};
use crate::emissions::EmissionModel;

/// Default ceiling for the clean-share bonus, in score points.
pub const DEFAULT_BONUS_CAP: f64 = 10.0;

/// Distances at or below this carry no meaningful intensity.
const MIN_DISTANCE_KM: f64 = 1e-6;

/// Computes bounded sustainability scores.
#[derive(Debug, Clone)]
pub struct Scorer {
    reference_intensity: f64,
    bonus_cap: f64,
}

impl Scorer {
    /// Create a scorer whose worst case is the model's car factor.
    pub fn new(model: &EmissionModel) -> Self {
        Self {
            reference_intensity: model.reference_intensity(),
            bonus_cap: DEFAULT_BONUS_CAP,
        }
    }

    /// Set the bonus ceiling. Negative or non-finite values disable it.
    pub fn with_bonus_cap(mut self, cap: f64) -> Self {
        self.bonus_cap = if cap.is_finite() && cap > 0.0 { cap } else { 0.0 };
        self
    }

    /// Score a route.
    pub fn score(&self, route: &RouteOption) -> u8 {
        self.score_totals(route.total_carbon_kg(), route.total_distance_km())
    }

    /// Score a sequence of segments as if they formed one route.
    pub fn score_segments(&self, segments: &[TransportSegment]) -> u8 {
        let carbon = segments.iter().map(|s| s.carbon_kg()).sum();
        let distance = segments.iter().map(|s| s.distance_km()).sum();
        self.score_totals(carbon, distance)
    }

    fn score_totals(&self, carbon_kg: f64, distance_km: f64) -> u8 {
        if !(distance_km.is_finite() && distance_km > MIN_DISTANCE_KM) {
            return 0;
        }

        let clean_share = self.clean_share(carbon_kg / distance_km);
        let base = clean_share * f64::from(MAX_SCORE);
        let bonus = self.bonus_cap * clean_share;

        let score = (base + bonus).clamp(0.0, f64::from(MAX_SCORE)).round();
        score as u8
    }

    /// How much cleaner than driving an intensity is, in [0, 1].
    fn clean_share(&self, intensity: f64) -> f64 {
        if self.reference_intensity <= 0.0 || !intensity.is_finite() {
            return 0.0;
        }
        (1.0 - intensity / self.reference_intensity).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Location, TransportMode};

    fn model() -> EmissionModel {
        EmissionModel::default()
    }

    fn route(parts: &[(TransportMode, f64)]) -> RouteOption {
        let model = model();
        let segments = parts
            .iter()
            .map(|&(mode, km)| TransportSegment::new(mode, km, km, &model))
            .collect();
        RouteOption::new("test", Location::new("A"), Location::new("B"), segments).unwrap()
    }

    #[test]
    fn car_scores_zero() {
        let scorer = Scorer::new(&model());
        assert_eq!(scorer.score(&route(&[(TransportMode::Car, 100.0)])), 0);
    }

    #[test]
    fn walking_scores_max() {
        let scorer = Scorer::new(&model());
        assert_eq!(scorer.score(&route(&[(TransportMode::Walk, 2.0)])), MAX_SCORE);
        assert_eq!(scorer.score(&route(&[(TransportMode::Bike, 8.0)])), MAX_SCORE);
    }

    #[test]
    fn plane_is_clamped_at_zero() {
        let scorer = Scorer::new(&model());
        assert_eq!(scorer.score(&route(&[(TransportMode::Plane, 300.0)])), 0);
    }

    #[test]
    fn train_beats_bus_beats_car() {
        let scorer = Scorer::new(&model());
        let train = scorer.score(&route(&[(TransportMode::Train, 300.0)]));
        let bus = scorer.score(&route(&[(TransportMode::Bus, 300.0)]));
        let car = scorer.score(&route(&[(TransportMode::Car, 300.0)]));
        assert!(train > bus, "train {train} bus {bus}");
        assert!(bus > car, "bus {bus} car {car}");
    }

    #[test]
    fn tram_never_scores_below_train() {
        let scorer = Scorer::new(&model());
        for km in [1.0, 12.5, 300.0] {
            let tram = scorer.score(&route(&[(TransportMode::Tram, km)]));
            let train = scorer.score(&route(&[(TransportMode::Train, km)]));
            let subway = scorer.score(&route(&[(TransportMode::Subway, km)]));
            assert!(tram >= train, "tram {tram} < train {train} over {km} km");
            assert!(subway >= tram, "subway {subway} < tram {tram} over {km} km");
        }
    }

    #[test]
    fn zero_distance_scores_zero() {
        let scorer = Scorer::new(&model());
        assert_eq!(scorer.score(&route(&[(TransportMode::Walk, 0.0)])), 0);
    }

    #[test]
    fn bonus_cap_changes_mid_range_scores() {
        let r = route(&[(TransportMode::Bus, 100.0)]);
        let with = Scorer::new(&model()).score(&r);
        let without = Scorer::new(&model()).with_bonus_cap(0.0).score(&r);

        // Bus is 0.105/0.192 of car: base ~45.3, bonus ~4.5.
        assert_eq!(without, 45);
        assert_eq!(with, 50);
    }

    #[test]
    fn score_segments_matches_route_score() {
        let scorer = Scorer::new(&model());
        let r = route(&[
            (TransportMode::Walk, 1.0),
            (TransportMode::Train, 200.0),
            (TransportMode::Car, 20.0),
        ]);
        assert_eq!(scorer.score(&r), scorer.score_segments(r.segments()));
    }

    #[test]
    fn zero_reference_scores_zero() {
        let model = EmissionModel::empty().with_emission_factor(TransportMode::Car, 0.0);
        let scorer = Scorer::new(&model);
        assert_eq!(scorer.score(&route(&[(TransportMode::Walk, 3.0)])), 0);
    }
}
