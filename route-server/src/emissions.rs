//! Emission and cost model.
//!
//! Maps a transport mode and distance to a carbon figure (kg CO2e) and a
//! cost. Both lookups are total: a mode missing from a table falls back to
//! the car factor, the worst road case, and the result is flagged as
//! estimated instead of failing.
//!
//! The emission table is the single canonical per-passenger-km table for the
//! planner. Cost factors are a flat per-km price per mode and are meant to be
//! overridden from configuration.

use std::collections::HashMap;

use tracing::debug;

use crate::domain::TransportMode;

/// Car emission factor (kg CO2e per passenger-km), used when a table has no
/// entry for car either.
pub const CAR_EMISSION_FACTOR: f64 = 0.192;

/// Car cost factor (currency per km), used when a table has no car entry.
pub const CAR_COST_FACTOR: f64 = 0.35;

/// Default emission factors, kg CO2e per passenger-km.
const DEFAULT_EMISSION_FACTORS: [(TransportMode, f64); 9] = [
    (TransportMode::Car, CAR_EMISSION_FACTOR),
    (TransportMode::Bus, 0.105),
    (TransportMode::Train, 0.041),
    (TransportMode::Subway, 0.028),
    (TransportMode::Tram, 0.029),
    (TransportMode::Ferry, 0.113),
    (TransportMode::Plane, 0.255),
    (TransportMode::Bike, 0.0),
    (TransportMode::Walk, 0.0),
];

/// Default cost factors, currency per km.
const DEFAULT_COST_FACTORS: [(TransportMode, f64); 9] = [
    (TransportMode::Car, CAR_COST_FACTOR),
    (TransportMode::Bus, 0.15),
    (TransportMode::Train, 0.20),
    (TransportMode::Subway, 0.12),
    (TransportMode::Tram, 0.12),
    (TransportMode::Ferry, 0.25),
    (TransportMode::Plane, 0.15),
    (TransportMode::Bike, 0.0),
    (TransportMode::Walk, 0.0),
];

/// A looked-up or derived figure, flagged when it came from a fallback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Factor {
    pub value: f64,
    pub estimated: bool,
}

impl Factor {
    fn exact(value: f64) -> Self {
        Self {
            value,
            estimated: false,
        }
    }
}

/// Per-mode emission and cost tables.
#[derive(Debug, Clone)]
pub struct EmissionModel {
    emission: HashMap<TransportMode, f64>,
    cost: HashMap<TransportMode, f64>,
}

impl EmissionModel {
    /// A model with no table entries; every lookup falls back to car.
    pub fn empty() -> Self {
        Self {
            emission: HashMap::new(),
            cost: HashMap::new(),
        }
    }

    /// Set the emission factor for a mode. Negative or non-finite values
    /// are ignored.
    pub fn with_emission_factor(mut self, mode: TransportMode, kg_per_km: f64) -> Self {
        if kg_per_km.is_finite() && kg_per_km >= 0.0 {
            self.emission.insert(mode, kg_per_km);
        }
        self
    }

    /// Set the cost factor for a mode. Negative or non-finite values are
    /// ignored.
    pub fn with_cost_factor(mut self, mode: TransportMode, per_km: f64) -> Self {
        if per_km.is_finite() && per_km >= 0.0 {
            self.cost.insert(mode, per_km);
        }
        self
    }

    /// Emission factor for `mode` in kg CO2e per km.
    pub fn emission_factor(&self, mode: TransportMode) -> Factor {
        lookup(&self.emission, mode, CAR_EMISSION_FACTOR)
    }

    /// Cost factor for `mode` in currency per km.
    pub fn cost_factor(&self, mode: TransportMode) -> Factor {
        lookup(&self.cost, mode, CAR_COST_FACTOR)
    }

    /// Worst-case reference intensity used for scoring and baselines: the
    /// car emission factor.
    pub fn reference_intensity(&self) -> f64 {
        self.emission_factor(TransportMode::Car).value
    }

    /// Carbon for travelling `distance_km` by `mode`.
    ///
    /// Zero, negative and NaN distances give exactly zero.
    pub fn segment_emission(&self, mode: TransportMode, distance_km: f64) -> Factor {
        let factor = self.emission_factor(mode);
        Factor {
            value: scale(distance_km, factor.value),
            estimated: factor.estimated,
        }
    }

    /// Cost of travelling `distance_km` by `mode`.
    pub fn segment_cost(&self, mode: TransportMode, distance_km: f64) -> Factor {
        let factor = self.cost_factor(mode);
        Factor {
            value: scale(distance_km, factor.value),
            estimated: factor.estimated,
        }
    }

    /// Emissions of covering `distance_km` by private car.
    pub fn baseline_emission(&self, distance_km: f64) -> f64 {
        scale(distance_km, self.reference_intensity())
    }
}

impl Default for EmissionModel {
    fn default() -> Self {
        Self {
            emission: DEFAULT_EMISSION_FACTORS.into_iter().collect(),
            cost: DEFAULT_COST_FACTORS.into_iter().collect(),
        }
    }
}

fn lookup(table: &HashMap<TransportMode, f64>, mode: TransportMode, car_default: f64) -> Factor {
    if let Some(&value) = table.get(&mode) {
        return Factor::exact(value);
    }

    let value = table
        .get(&TransportMode::Car)
        .copied()
        .unwrap_or(car_default);

    debug!(mode = %mode, value, "no factor for mode, using car factor");

    Factor {
        value,
        estimated: true,
    }
}

fn scale(distance_km: f64, factor: f64) -> f64 {
    if distance_km.is_finite() && distance_km > 0.0 {
        distance_km * factor
    } else {
        0.0
    }
}
