//! Planner configuration.

/// Configuration parameters for route planning.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Maximum number of routes returned after sorting.
    pub max_routes: usize,

    /// Ceiling for the score bonus, in points.
    pub bonus_cap: f64,
}

impl PlannerConfig {
    pub fn with_max_routes(mut self, max_routes: usize) -> Self {
        self.max_routes = max_routes;
        self
    }

    pub fn with_bonus_cap(mut self, bonus_cap: f64) -> Self {
        self.bonus_cap = bonus_cap;
        self
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_routes: 10,
            bonus_cap: super::score::DEFAULT_BONUS_CAP,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlannerConfig::default();
        assert_eq!(config.max_routes, 10);
        assert_eq!(config.bonus_cap, 10.0);
    }

    #[test]
    fn builders() {
        let config = PlannerConfig::default()
            .with_max_routes(3)
            .with_bonus_cap(5.0);
        assert_eq!(config.max_routes, 3);
        assert_eq!(config.bonus_cap, 5.0);
    }
}
