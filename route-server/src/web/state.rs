//! Application state for the web layer.

use std::sync::Arc;

use crate::planner::RoutePlanner;
use crate::ratelimit::RateLimiter;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Route planner, including its plan cache
    pub planner: Arc<RoutePlanner>,

    /// Admission control for the planning endpoint
    pub limiter: Arc<RateLimiter>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(planner: RoutePlanner, limiter: RateLimiter) -> Self {
        Self {
            planner: Arc::new(planner),
            limiter: Arc::new(limiter),
        }
    }
}
