//! Domain error types.
//!
//! These errors represent validation failures in the domain layer. They are
//! distinct from provider and pipeline errors.

/// Domain-level errors for validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// A route must have at least one segment
    #[error("route must have at least one segment")]
    EmptyRoute,

    /// Coordinates outside the valid WGS84 range
    #[error("invalid coordinates: ({lat}, {lng})")]
    InvalidCoordinates { lat: f64, lng: f64 },

    /// A preference value is out of range
    #[error("invalid preference: {0}")]
    InvalidPreference(&'static str),

    /// A mode name that isn't one of the known modes
    #[error("unknown transport mode: {0}")]
    UnknownMode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DomainError::EmptyRoute;
        assert_eq!(err.to_string(), "route must have at least one segment");

        let err = DomainError::InvalidCoordinates {
            lat: 91.0,
            lng: 0.5,
        };
        assert_eq!(err.to_string(), "invalid coordinates: (91, 0.5)");

        let err = DomainError::InvalidPreference("budget_limit must be a positive amount");
        assert_eq!(
            err.to_string(),
            "invalid preference: budget_limit must be a positive amount"
        );

        let err = DomainError::UnknownMode("zeppelin".into());
        assert_eq!(err.to_string(), "unknown transport mode: zeppelin");
    }
}
