//! Routing providers and normalisation.
//!
//! Providers return routes in their own shapes. This module defines the
//! capability every provider implements, the raw payload shapes, the fan-out
//! that consults all providers for a request, and the normaliser that turns
//! raw routes into canonical `RouteOption`s.
//!
//! Provider failures stop here: an unreachable, misconfigured or slow
//! provider simply contributes no routes.

mod aggregate;
mod convert;
mod error;
mod fixture;
mod source;
mod types;

pub use aggregate::{DEFAULT_PROVIDER_TIMEOUT, ProviderRoutes, ProviderSet, ProviderStatus};
pub use convert::{normalize_route, normalize_routes};
pub use error::ProviderError;
pub use fixture::{FixtureEntry, FixtureProvider};
pub use source::{RouteProvider, RouteQuery};
pub use types::{
    DirectionsLeg, DirectionsRoute, DirectionsTransit, ItineraryLeg, ItineraryPlace, LatLng,
    RawProviderRoute, RouteSummary, TransitItinerary,
};
