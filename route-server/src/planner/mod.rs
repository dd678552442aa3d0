//! Route planning.
//!
//! Turns a request for travel between two places into an ordered, scored
//! set of route options with sustainability insights:
//!
//! 1. consult every provider and normalise what they return
//! 2. score each route against driving the same distance
//! 3. filter and order by the user's preferences
//! 4. compare the best route with the conventional baseline

mod config;
mod insights;
mod plan;
mod rank;
mod score;


pub use config::PlannerConfig;
pub use insights::{
    ConventionalComparison, Insights, MAX_RECOMMENDATIONS, Narrative, NarrativeError,
    NarrativeSource, best_route, conventional_comparison, generate_insights,
};
pub use plan::{PlanError, PlanRequest, RoutePlan, RoutePlanner};
pub use rank::{apply_preferences, filter_by_preferences, sort_routes};
pub use score::{DEFAULT_BONUS_CAP, Scorer};
