use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use route_server::cache::PlanCache;
use route_server::config::ServerConfig;
use route_server::planner::{PlannerConfig, RoutePlanner};
use route_server::providers::{FixtureProvider, ProviderSet, RouteProvider};
use route_server::ratelimit::RateLimiter;
use route_server::web::{AppState, create_router};

/// How often to sweep expired cache entries and idle rate-limit clients.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("route_server=info")),
        )
        .init();

    let config = ServerConfig::from_env()?;

    // Load fixture providers; without them every request finds no routes
    let providers: Vec<Arc<dyn RouteProvider>> = match FixtureProvider::load_dir(&config.fixtures_dir)
    {
        Ok(providers) => {
            for p in &providers {
                info!(provider = p.name(), pairs = p.entry_count(), "loaded provider");
            }
            providers
                .into_iter()
                .map(|p| Arc::new(p) as Arc<dyn RouteProvider>)
                .collect()
        }
        Err(e) => {
            warn!(dir = %config.fixtures_dir.display(), error = %e, "failed to load providers");
            Vec::new()
        }
    };

    let provider_set = ProviderSet::new(providers).with_timeout(config.provider_timeout);
    if provider_set.is_empty() {
        warn!("no providers configured; every request will find no routes");
    } else {
        info!(count = provider_set.len(), timeout = ?config.provider_timeout, "providers ready");
    }
    let cache = Arc::new(PlanCache::new(&config.cache));
    let planner = RoutePlanner::new(
        provider_set,
        cache.clone(),
        config.emission_model(),
        PlannerConfig::default(),
    );
    let limiter = RateLimiter::new(&config.rate_limit);

    let state = AppState::new(planner, limiter);

    // Spawn background task to sweep the cache and rate limiter
    let limiter = state.limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SWEEP_INTERVAL);
        interval.tick().await; // First tick is immediate, skip it
        loop {
            interval.tick().await;
            cache.run_pending_tasks().await;
            let removed = limiter.cleanup();
            debug!(
                cache_entries = cache.entry_count(),
                removed_clients = removed,
                "sweep complete"
            );
        }
    });

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!(addr = %config.addr, "route planner listening");
    info!("  GET  /health       - Health check");
    info!("  GET  /status       - Cache, rate limit and provider status");
    info!("  POST /routes/plan  - Plan routes");

    axum::serve(listener, app).await?;
    Ok(())
}
