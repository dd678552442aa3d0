//! The route provider capability.

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::domain::TransportMode;

use super::error::ProviderError;
use super::types::RawProviderRoute;

/// What a provider is asked for.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteQuery {
    pub origin: String,
    pub destination: String,

    /// Desired departure; `None` means now
    pub departure: Option<NaiveDateTime>,

    /// Modes the user prefers. Providers may use these to pick what to
    /// return; the normaliser uses the first one for aggregate-only routes.
    pub mode_hints: Vec<TransportMode>,
}

impl RouteQuery {
    /// Create a query for departing now with no mode hints.
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            departure: None,
            mode_hints: Vec::new(),
        }
    }

    pub fn with_departure(mut self, departure: Option<NaiveDateTime>) -> Self {
        self.departure = departure;
        self
    }

    pub fn with_mode_hints(mut self, hints: impl IntoIterator<Item = TransportMode>) -> Self {
        self.mode_hints = hints.into_iter().collect();
        self
    }
}

/// A routing provider.
///
/// Implementations wrap whatever client talks to the provider. They return
/// the provider's own route shapes; normalisation happens elsewhere. The
/// aggregator is written against this trait only, so adding a provider
/// doesn't touch scoring or caching.
#[async_trait]
pub trait RouteProvider: Send + Sync {
    /// Stable name used in logs and on produced routes.
    fn name(&self) -> &str;

    /// Whether the provider is configured and worth calling.
    fn is_available(&self) -> bool;

    /// Fetch zero or more routes for the query.
    async fn fetch_routes(&self, query: &RouteQuery)
    -> Result<Vec<RawProviderRoute>, ProviderError>;
}
