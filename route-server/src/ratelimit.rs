//! Sliding-window request admission keyed by client identifier.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::http::HeaderMap;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::clock::{Clock, SystemClock};

/// Bucket used when no forwarding header identifies the client.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Headers consulted for the client address, in priority order.
const CLIENT_HEADERS: [&str; 3] = ["x-forwarded-for", "x-real-ip", "cf-connecting-ip"];

/// Longest accepted window.
pub const MAX_WINDOW: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Configuration for the rate limiter.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Requests admitted per client within one window.
    pub max_requests: usize,

    /// Length of the trailing window.
    pub window: Duration,
}

impl RateLimitConfig {
    pub fn with_max_requests(mut self, max_requests: usize) -> Self {
        self.max_requests = max_requests;
        self
    }

    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 60,
            window: Duration::from_secs(60),
        }
    }
}

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The request may proceed; `remaining` more fit in the current window.
    Admitted { remaining: usize },

    /// The request is refused until at least `retry_after` has passed.
    Rejected { retry_after: Duration },
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted { .. })
    }
}

/// Per-client sliding-window rate limiter.
pub struct RateLimiter {
    max_requests: usize,
    window: chrono::Duration,
    clock: Arc<dyn Clock>,
    history: Mutex<HashMap<String, VecDeque<DateTime<Utc>>>>,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            max_requests: config.max_requests,
            window: chrono::Duration::from_std(config.window).unwrap_or(chrono::Duration::MAX),
            clock,
            history: Mutex::new(HashMap::new()),
        }
    }

    /// Record a request from `client` and decide whether to admit it.
    ///
    /// Rejected requests are not recorded, so a client that keeps retrying
    /// is let back in as soon as its oldest admitted request leaves the
    /// window.
    pub fn check(&self, client: &str) -> Admission {
        let now = self.clock.now();
        let cutoff = self.cutoff(now);

        let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        let stamps = history.entry(client.to_string()).or_default();
        prune(stamps, cutoff);

        if stamps.len() < self.max_requests {
            stamps.push_back(now);
            return Admission::Admitted {
                remaining: self.max_requests - stamps.len(),
            };
        }

        let retry_after = stamps
            .front()
            .and_then(|oldest| oldest.checked_add_signed(self.window))
            .and_then(|leaves| (leaves - now).to_std().ok())
            .unwrap_or_default()
            .max(Duration::from_secs(1));

        debug!(client, retry_after_secs = retry_after.as_secs(), "rate limited");
        Admission::Rejected { retry_after }
    }

    /// Drop clients with no requests inside the current window.
    ///
    /// Returns the number of clients removed.
    pub fn cleanup(&self) -> usize {
        let cutoff = self.cutoff(self.clock.now());

        let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        let before = history.len();
        history.retain(|_, stamps| {
            prune(stamps, cutoff);
            !stamps.is_empty()
        });

        before - history.len()
    }

    /// Timestamps at or before this have left the window. `None` when the
    /// window reaches back past the earliest representable time.
    fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        now.checked_sub_signed(self.window)
    }

    /// Number of clients currently tracked (for monitoring).
    pub fn tracked_clients(&self) -> usize {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

fn prune(stamps: &mut VecDeque<DateTime<Utc>>, cutoff: Option<DateTime<Utc>>) {
    let Some(cutoff) = cutoff else { return };
    while stamps.front().is_some_and(|t| *t <= cutoff) {
        stamps.pop_front();
    }
}

/// Identify the client behind a request from its forwarding headers.
///
/// The first header with a non-empty value wins; for `X-Forwarded-For`
/// only the first (client-most) address is used.
pub fn client_key(headers: &HeaderMap) -> String {
    CLIENT_HEADERS
        .iter()
        .filter_map(|name| headers.get(*name))
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(',').next())
        .map(str::trim)
        .find(|value| !value.is_empty())
        .unwrap_or(UNKNOWN_CLIENT)
        .to_string()
}
