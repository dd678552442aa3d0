//! User preference types.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{DomainError, TransportMode};

/// Filter and ordering preferences for a planning request.
///
/// `preferred_transport_modes` never removes routes; it is passed to
/// providers as a hint. The set is ordered so that serialisation is
/// canonical.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    /// Order by sustainability score instead of duration
    pub prioritize_sustainability: bool,

    /// Maximum total travel time in minutes
    pub max_travel_time: Option<u32>,

    /// Maximum total cost in currency units
    pub budget_limit: Option<f64>,

    /// Modes the user would like to use
    pub preferred_transport_modes: BTreeSet<TransportMode>,
}

impl UserPreferences {
    /// Check that limits, when present, are positive.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.max_travel_time == Some(0) {
            return Err(DomainError::InvalidPreference(
                "max_travel_time must be greater than zero",
            ));
        }

        if let Some(budget) = self.budget_limit
            && !(budget.is_finite() && budget > 0.0)
        {
            return Err(DomainError::InvalidPreference(
                "budget_limit must be a positive amount",
            ));
        }

        Ok(())
    }

    /// True when these preferences neither filter nor change ordering, so
    /// the request behaves exactly as if no preferences were given.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid_and_empty() {
        let prefs = UserPreferences::default();
        assert!(prefs.validate().is_ok());
        assert!(prefs.is_empty());
    }

    #[test]
    fn zero_travel_time_rejected() {
        let prefs = UserPreferences {
            max_travel_time: Some(0),
            ..Default::default()
        };
        let err = prefs.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid preference: max_travel_time must be greater than zero"
        );
    }

    #[test]
    fn non_positive_budget_rejected() {
        for budget in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let prefs = UserPreferences {
                budget_limit: Some(budget),
                ..Default::default()
            };
            assert!(prefs.validate().is_err(), "budget {budget} accepted");
        }
    }

    #[test]
    fn deserialize_partial() {
        let prefs: UserPreferences =
            serde_json::from_str(r#"{"max_travel_time": 90, "preferred_transport_modes": ["train", "bus"]}"#)
                .unwrap();
        assert_eq!(prefs.max_travel_time, Some(90));
        assert!(!prefs.prioritize_sustainability);
        assert_eq!(prefs.budget_limit, None);
        assert_eq!(prefs.preferred_transport_modes.len(), 2);
        assert!(!prefs.is_empty());
    }

    #[test]
    fn serialization_is_canonical() {
        let a = UserPreferences {
            preferred_transport_modes: [TransportMode::Walk, TransportMode::Bus].into(),
            ..Default::default()
        };
        let b = UserPreferences {
            preferred_transport_modes: [TransportMode::Bus, TransportMode::Walk].into(),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
