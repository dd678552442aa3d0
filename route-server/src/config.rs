//! Server configuration from the environment.
//!
//! | Variable | Default |
//! | --- | --- |
//! | `ROUTE_SERVER_ADDR` | `127.0.0.1:3000` |
//! | `ROUTE_FIXTURES_DIR` | `data/providers` |
//! | `ROUTE_CACHE_TTL_SECS` | `300` |
//! | `ROUTE_CACHE_CAPACITY` | `1000` |
//! | `ROUTE_RATE_LIMIT_REQUESTS` | `60` |
//! | `ROUTE_RATE_LIMIT_WINDOW_SECS` | `60` |
//! | `ROUTE_PROVIDER_TIMEOUT_SECS` | `10` |
//! | `ROUTE_COST_TABLE` | built-in per-km prices |
//!
//! `ROUTE_COST_TABLE` overrides individual per-km prices, e.g.
//! `car=0.42,train=0.18`. Modes not listed keep their default price.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{CacheConfig, MAX_TTL};
use crate::domain::TransportMode;
use crate::emissions::EmissionModel;
use crate::providers::DEFAULT_PROVIDER_TIMEOUT;
use crate::ratelimit::{MAX_WINDOW, RateLimitConfig};

/// Longest accepted provider timeout.
const MAX_PROVIDER_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// Error reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable is set but can't be parsed
    #[error("invalid value for {name}: {value:?} ({reason})")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(name: &'static str, value: &str, reason: impl ToString) -> Self {
        ConfigError::InvalidValue {
            name,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Everything the binary needs to start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub fixtures_dir: PathBuf,
    pub cache: CacheConfig,
    pub rate_limit: RateLimitConfig,
    pub provider_timeout: Duration,
    pub cost_overrides: Vec<(TransportMode, f64)>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            fixtures_dir: PathBuf::from("data/providers"),
            cache: CacheConfig::default(),
            rate_limit: RateLimitConfig::default(),
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
            cost_overrides: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, which returns a variable's
    /// value if it is set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("ROUTE_SERVER_ADDR") {
            config.addr = parse("ROUTE_SERVER_ADDR", &v)?;
        }
        if let Some(v) = get("ROUTE_FIXTURES_DIR") {
            config.fixtures_dir = PathBuf::from(v.trim());
        }
        if let Some(v) = get("ROUTE_CACHE_TTL_SECS") {
            let ttl = bounded_secs("ROUTE_CACHE_TTL_SECS", &v, MAX_TTL)?;
            config.cache = config.cache.with_ttl(ttl);
        }
        if let Some(v) = get("ROUTE_CACHE_CAPACITY") {
            let capacity = parse("ROUTE_CACHE_CAPACITY", &v)?;
            config.cache = config.cache.with_max_capacity(capacity);
        }
        if let Some(v) = get("ROUTE_RATE_LIMIT_REQUESTS") {
            let max: usize = parse("ROUTE_RATE_LIMIT_REQUESTS", &v)?;
            if max == 0 {
                return Err(ConfigError::invalid(
                    "ROUTE_RATE_LIMIT_REQUESTS",
                    &v,
                    "must be at least 1",
                ));
            }
            config.rate_limit = config.rate_limit.with_max_requests(max);
        }
        if let Some(v) = get("ROUTE_RATE_LIMIT_WINDOW_SECS") {
            let window = bounded_secs("ROUTE_RATE_LIMIT_WINDOW_SECS", &v, MAX_WINDOW)?;
            config.rate_limit = config.rate_limit.with_window(window);
        }
        if let Some(v) = get("ROUTE_PROVIDER_TIMEOUT_SECS") {
            config.provider_timeout =
                bounded_secs("ROUTE_PROVIDER_TIMEOUT_SECS", &v, MAX_PROVIDER_TIMEOUT)?;
        }
        if let Some(v) = get("ROUTE_COST_TABLE") {
            config.cost_overrides = parse_cost_table(&v)?;
        }

        Ok(config)
    }

    /// The emission model with any configured cost overrides applied.
    pub fn emission_model(&self) -> EmissionModel {
        self.cost_overrides
            .iter()
            .fold(EmissionModel::default(), |model, &(mode, price)| {
                model.with_cost_factor(mode, price)
            })
    }
}

fn parse<T>(name: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| ConfigError::invalid(name, value, e))
}

/// Whole seconds in `1..=max`.
fn bounded_secs(name: &'static str, value: &str, max: Duration) -> Result<Duration, ConfigError> {
    let secs: u64 = parse(name, value)?;
    if secs == 0 {
        return Err(ConfigError::invalid(name, value, "must be at least 1"));
    }
    if secs > max.as_secs() {
        return Err(ConfigError::invalid(
            name,
            value,
            format!("must be at most {}", max.as_secs()),
        ));
    }
    Ok(Duration::from_secs(secs))
}

fn parse_cost_table(value: &str) -> Result<Vec<(TransportMode, f64)>, ConfigError> {
    const NAME: &str = "ROUTE_COST_TABLE";

    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (mode, price) = entry
                .split_once('=')
                .ok_or_else(|| ConfigError::invalid(NAME, entry, "expected mode=price"))?;
            let mode: TransportMode = mode.parse().map_err(|e| ConfigError::invalid(NAME, entry, e))?;
            let price: f64 = parse(NAME, price)?;
            if !(price.is_finite() && price >= 0.0) {
                return Err(ConfigError::invalid(NAME, entry, "price must be non-negative"));
            }
            Ok((mode, price))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_vars(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let config = from_vars(&[]).unwrap();
        assert_eq!(config.addr, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(config.fixtures_dir, PathBuf::from("data/providers"));
        assert_eq!(config.cache.ttl, Duration::from_secs(300));
        assert_eq!(config.cache.max_capacity, 1000);
        assert_eq!(config.rate_limit.max_requests, 60);
        assert_eq!(config.rate_limit.window, Duration::from_secs(60));
        assert_eq!(config.provider_timeout, Duration::from_secs(10));
        assert!(config.cost_overrides.is_empty());
    }

    #[test]
    fn overrides() {
        let config = from_vars(&[
            ("ROUTE_SERVER_ADDR", "0.0.0.0:8080"),
            ("ROUTE_FIXTURES_DIR", "/srv/fixtures"),
            ("ROUTE_CACHE_TTL_SECS", "120"),
            ("ROUTE_CACHE_CAPACITY", "50"),
            ("ROUTE_RATE_LIMIT_REQUESTS", "5"),
            ("ROUTE_RATE_LIMIT_WINDOW_SECS", "10"),
            ("ROUTE_PROVIDER_TIMEOUT_SECS", "3"),
        ])
        .unwrap();

        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.fixtures_dir, PathBuf::from("/srv/fixtures"));
        assert_eq!(config.cache.ttl, Duration::from_secs(120));
        assert_eq!(config.cache.max_capacity, 50);
        assert_eq!(config.rate_limit.max_requests, 5);
        assert_eq!(config.rate_limit.window, Duration::from_secs(10));
        assert_eq!(config.provider_timeout, Duration::from_secs(3));
    }

    #[test]
    fn empty_values_use_defaults() {
        let config = from_vars(&[("ROUTE_CACHE_TTL_SECS", "  ")]).unwrap();
        assert_eq!(config.cache.ttl, Duration::from_secs(300));
    }

    #[test]
    fn malformed_values_are_errors() {
        for (name, value) in [
            ("ROUTE_SERVER_ADDR", "localhost"),
            ("ROUTE_CACHE_TTL_SECS", "five minutes"),
            ("ROUTE_CACHE_TTL_SECS", "0"),
            ("ROUTE_RATE_LIMIT_REQUESTS", "0"),
            ("ROUTE_RATE_LIMIT_WINDOW_SECS", "-1"),
        ] {
            let err = from_vars(&[(name, value)]).unwrap_err();
            assert!(err.to_string().contains(name), "{err}");
        }
    }

    #[test]
    fn oversized_durations_are_errors() {
        for (name, value) in [
            ("ROUTE_CACHE_TTL_SECS", "100000000000"),
            ("ROUTE_RATE_LIMIT_WINDOW_SECS", "10000000000000"),
            ("ROUTE_PROVIDER_TIMEOUT_SECS", "3601"),
        ] {
            match from_vars(&[(name, value)]) {
                Err(ConfigError::InvalidValue { name: got, .. }) => assert_eq!(got, name),
                Ok(_) => panic!("{name}={value} should be rejected"),
            }
        }
    }

    #[test]
    fn largest_accepted_durations_are_usable() {
        let config = from_vars(&[
            ("ROUTE_CACHE_TTL_SECS", "31536000"),
            ("ROUTE_RATE_LIMIT_WINDOW_SECS", "31536000"),
        ])
        .unwrap();
        assert_eq!(config.cache.ttl, MAX_TTL);
        assert_eq!(config.rate_limit.window, MAX_WINDOW);

        let _cache = crate::cache::PlanCache::new(&config.cache);
        let limiter = crate::ratelimit::RateLimiter::new(&config.rate_limit);
        assert!(limiter.check("a").is_admitted());
        assert_eq!(limiter.cleanup(), 0);
    }

    #[test]
    fn cost_table_overrides_prices() {
        let config = from_vars(&[("ROUTE_COST_TABLE", "car=0.42, train = 0.18,")]).unwrap();
        assert_eq!(
            config.cost_overrides,
            vec![(TransportMode::Car, 0.42), (TransportMode::Train, 0.18)]
        );

        let model = config.emission_model();
        assert_eq!(model.cost_factor(TransportMode::Car).value, 0.42);
        assert_eq!(model.cost_factor(TransportMode::Train).value, 0.18);
        assert_eq!(model.cost_factor(TransportMode::Bus).value, 0.15);
    }

    #[test]
    fn bad_cost_table_is_error() {
        for table in ["car", "hovercraft=1.0", "car=cheap", "car=-1"] {
            assert!(from_vars(&[("ROUTE_COST_TABLE", table)]).is_err(), "{table}");
        }
    }
}
