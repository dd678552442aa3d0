//! Route aggregation and sustainability scoring server.
//!
//! Collects route options between two places from several routing
//! providers, normalises them into one model, estimates carbon and cost per
//! segment, scores each route's sustainability, and ranks the results
//! against the user's preferences. Computed plans are cached and the
//! planning endpoint is rate limited per client.

pub mod cache;
pub mod clock;
pub mod config;
pub mod domain;
pub mod emissions;
pub mod planner;
pub mod providers;
pub mod ratelimit;
pub mod web;
