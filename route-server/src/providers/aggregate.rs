//! Fan-out to all configured providers.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, warn};

use super::error::ProviderError;
use super::source::{RouteProvider, RouteQuery};
use super::types::RawProviderRoute;

/// Default per-provider timeout.
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

/// Raw routes returned by one provider.
#[derive(Debug, Clone)]
pub struct ProviderRoutes {
    pub provider: String,
    pub routes: Vec<RawProviderRoute>,
}

/// Availability of one provider, for status reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderStatus {
    pub name: String,
    pub available: bool,
}

/// The set of providers consulted for every planning request.
#[derive(Clone)]
pub struct ProviderSet {
    providers: Vec<Arc<dyn RouteProvider>>,
    timeout: Duration,
}

impl ProviderSet {
    /// Create a provider set. Providers are consulted, and their routes
    /// yielded, in the order given.
    pub fn new(providers: Vec<Arc<dyn RouteProvider>>) -> Self {
        Self {
            providers,
            timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }

    /// Set the per-provider timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Availability of each provider, in registration order.
    pub fn statuses(&self) -> Vec<ProviderStatus> {
        self.providers
            .iter()
            .map(|p| ProviderStatus {
                name: p.name().to_string(),
                available: p.is_available(),
            })
            .collect()
    }

    /// Query every provider concurrently and wait for all of them.
    ///
    /// A provider that is unavailable, errors or times out contributes an
    /// empty list. The result has one entry per provider, in registration
    /// order.
    pub async fn fetch_all(&self, query: &RouteQuery) -> Vec<ProviderRoutes> {
        let calls = self
            .providers
            .iter()
            .map(|provider| self.fetch_one(provider.as_ref(), query));

        join_all(calls).await
    }

    async fn fetch_one(&self, provider: &dyn RouteProvider, query: &RouteQuery) -> ProviderRoutes {
        let name = provider.name().to_string();

        if !provider.is_available() {
            debug!(provider = %name, "provider unavailable, skipping");
            return ProviderRoutes {
                provider: name,
                routes: Vec::new(),
            };
        }

        let result = match tokio::time::timeout(self.timeout, provider.fetch_routes(query)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(self.timeout)),
        };

        let routes = match result {
            Ok(routes) => {
                debug!(provider = %name, count = routes.len(), "provider answered");
                routes
            }
            Err(e) => {
                warn!(provider = %name, error = %e, "provider failed, continuing without it");
                Vec::new()
            }
        };

        ProviderRoutes {
            provider: name,
            routes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::types::RouteSummary;
    use async_trait::async_trait;

    struct StubProvider {
        name: &'static str,
        available: bool,
        delay: Duration,
        outcome: Result<usize, &'static str>,
    }

    impl StubProvider {
        fn ok(name: &'static str, count: usize) -> Self {
            Self {
                name,
                available: true,
                delay: Duration::ZERO,
                outcome: Ok(count),
            }
        }
    }

    #[async_trait]
    impl RouteProvider for StubProvider {
        fn name(&self) -> &str {
            self.name
        }

        fn is_available(&self) -> bool {
            self.available
        }

        async fn fetch_routes(
            &self,
            _query: &RouteQuery,
        ) -> Result<Vec<RawProviderRoute>, ProviderError> {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            match self.outcome {
                Ok(count) => Ok((0..count)
                    .map(|i| {
                        RawProviderRoute::Summary(RouteSummary {
                            distance_km: Some(i as f64 + 1.0),
                            duration_minutes: Some(10.0),
                            mode: None,
                        })
                    })
                    .collect()),
                Err(msg) => Err(ProviderError::Unavailable(msg.to_string())),
            }
        }
    }

    fn query() -> RouteQuery {
        RouteQuery::new("A", "B")
    }

    #[tokio::test]
    async fn collects_in_registration_order() {
        let set = ProviderSet::new(vec![
            Arc::new(StubProvider::ok("first", 2)),
            Arc::new(StubProvider::ok("second", 1)),
        ]);

        assert_eq!(set.len(), 2);
        assert!(!set.is_empty());

        let results = set.fetch_all(&query()).await;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].provider, "first");
        assert_eq!(results[0].routes.len(), 2);
        assert_eq!(results[1].provider, "second");
        assert_eq!(results[1].routes.len(), 1);
    }

    #[tokio::test]
    async fn empty_set_yields_nothing() {
        let set = ProviderSet::new(Vec::new());
        assert!(set.is_empty());
        assert!(set.fetch_all(&query()).await.is_empty());
    }

    #[tokio::test]
    async fn failing_provider_contributes_nothing() {
        let set = ProviderSet::new(vec![
            Arc::new(StubProvider {
                outcome: Err("connection refused"),
                ..StubProvider::ok("broken", 0)
            }),
            Arc::new(StubProvider::ok("working", 3)),
        ]);

        let results = set.fetch_all(&query()).await;
        assert!(results[0].routes.is_empty());
        assert_eq!(results[1].routes.len(), 3);
    }

    #[tokio::test]
    async fn unavailable_provider_is_skipped() {
        let set = ProviderSet::new(vec![Arc::new(StubProvider {
            available: false,
            ..StubProvider::ok("offline", 5)
        })]);

        let results = set.fetch_all(&query()).await;
        assert!(results[0].routes.is_empty());
        assert_eq!(
            set.statuses(),
            vec![ProviderStatus {
                name: "offline".into(),
                available: false
            }]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn slow_provider_times_out_without_dropping_others() {
        let set = ProviderSet::new(vec![
            Arc::new(StubProvider {
                delay: Duration::from_secs(30),
                ..StubProvider::ok("slow", 4)
            }),
            Arc::new(StubProvider {
                delay: Duration::from_secs(2),
                ..StubProvider::ok("steady", 1)
            }),
        ])
        .with_timeout(Duration::from_secs(5));

        let results = set.fetch_all(&query()).await;
        assert!(results[0].routes.is_empty());
        assert_eq!(results[1].routes.len(), 1);
    }
}
