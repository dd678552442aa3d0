//! Caching layer for computed route plans.
//!
//! Plans are keyed by a fingerprint of the request fields that affect the
//! result. An entry is fresh while younger than the TTL and is treated as
//! absent afterwards; `put` always replaces any existing entry.
//!
//! Concurrent misses for the same fingerprint are not coalesced: each one
//! computes its plan and the last write wins.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, Utc};
use moka::future::Cache as MokaCache;
use serde::Serialize;

use crate::clock::{Clock, SystemClock};
use crate::domain::UserPreferences;
use crate::planner::RoutePlan;

/// Stand-in for "leave now" in fingerprints.
const NOW_SENTINEL: &str = "now";

/// Longest accepted TTL. Longer values are clamped to this.
pub const MAX_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// How long a plan stays fresh.
    pub ttl: Duration,

    /// Maximum number of cached plans.
    pub max_capacity: u64,
}

impl CacheConfig {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_max_capacity(mut self, max_capacity: u64) -> Self {
        self.max_capacity = max_capacity;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_capacity: 1000,
        }
    }
}

/// Fields that go into a fingerprint, serialised in this order.
#[derive(Debug, Serialize)]
struct FingerprintFields<'a> {
    origin: String,
    destination: String,
    travel_date: String,
    preferences: Option<&'a UserPreferences>,
}

/// Compute the cache key for a planning request.
///
/// Addresses are compared ignoring surrounding whitespace only, so a
/// cached plan always echoes the caller's own spelling; preferences that change nothing are treated the same as no preferences.
/// Every other difference in the inputs gives a different key.
///
/// # Examples
///
/// ```
/// use route_server::cache::fingerprint;
///
/// let a = fingerprint("New York, NY", "Boston, MA", None, None);
/// let b = fingerprint(" New York, NY", "Boston, MA ", None, None);
/// assert_eq!(a, b);
///
/// let c = fingerprint("new york, ny", "Boston, MA", None, None);
/// assert_ne!(a, c);
/// ```
pub fn fingerprint(
    origin: &str,
    destination: &str,
    travel_date: Option<NaiveDateTime>,
    preferences: Option<&UserPreferences>,
) -> String {
    let fields = FingerprintFields {
        origin: canonical_place(origin),
        destination: canonical_place(destination),
        travel_date: travel_date
            .map(|d| d.format("%Y-%m-%dT%H:%M:%S").to_string())
            .unwrap_or_else(|| NOW_SENTINEL.to_string()),
        preferences: preferences.filter(|p| !p.is_empty()),
    };

    // Serialising plain strings, numbers and sets cannot fail; the Debug
    // form is just as unambiguous if it ever did.
    serde_json::to_string(&fields).unwrap_or_else(|_| format!("{fields:?}"))
}

fn canonical_place(s: &str) -> String {
    s.trim().to_string()
}

/// A stored plan and when it was written.
#[derive(Clone)]
struct CacheEntry {
    plan: Arc<RoutePlan>,
    inserted_at: DateTime<Utc>,
}

/// Cache of computed route plans.
pub struct PlanCache {
    entries: MokaCache<String, CacheEntry>,
    ttl: chrono::Duration,
    clock: Arc<dyn Clock>,
}

impl PlanCache {
    /// Create a cache using the system clock.
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a cache with a custom time source.
    pub fn with_clock(config: &CacheConfig, clock: Arc<dyn Clock>) -> Self {
        let ttl = config.ttl.min(MAX_TTL);

        // Moka's own expiry bounds memory; freshness is judged against `clock`.
        let entries = MokaCache::builder()
            .time_to_live(ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            entries,
            ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX),
            clock,
        }
    }

    /// Get a fresh plan, if there is one.
    pub async fn get(&self, fingerprint: &str) -> Option<Arc<RoutePlan>> {
        let entry = self.entries.get(fingerprint).await?;
        let age = self.clock.now() - entry.inserted_at;

        if age < self.ttl {
            Some(entry.plan)
        } else {
            None
        }
    }

    /// Store a plan, replacing any existing entry for the fingerprint.
    pub async fn put(&self, fingerprint: String, plan: Arc<RoutePlan>) {
        let entry = CacheEntry {
            plan,
            inserted_at: self.clock.now(),
        };
        self.entries.insert(fingerprint, entry).await;
    }

    /// Number of stored entries (for monitoring). May lag recent writes.
    pub fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }

    /// Evict expired entries now rather than lazily.
    pub async fn run_pending_tasks(&self) {
        self.entries.run_pending_tasks().await;
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.entries.invalidate_all();
    }
}
