//! Domain types for the route planner.
//!
//! This module contains the canonical route model that every provider's
//! data is normalised into. Types enforce their invariants at construction
//! time, so code that receives them can trust their figures.

mod error;
mod location;
mod mode;
mod preferences;
mod route;
mod segment;

pub use error::DomainError;
pub use location::{Coordinates, Location};
pub use mode::TransportMode;
pub use preferences::UserPreferences;
pub use route::{MAX_SCORE, RouteOption};
pub use segment::{TransitDetails, TransportSegment};
