//! The route planning pipeline.
//!
//! A request is validated and fingerprinted, then served from the cache if a
//! fresh plan exists. Otherwise every provider is consulted, their routes are
//! normalised and scored, filtered and ordered by the user's preferences, and
//! summarised. The finished plan is cached before it is returned.

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::{PlanCache, fingerprint};
use crate::domain::{DomainError, RouteOption, UserPreferences};
use crate::emissions::EmissionModel;
use crate::providers::{ProviderSet, ProviderStatus, RouteQuery, normalize_routes};

use super::config::PlannerConfig;
use super::insights::{ConventionalComparison, Narrative, NarrativeSource, generate_insights};
use super::rank::apply_preferences;
use super::score::Scorer;

/// Error from route planning.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PlanError {
    /// The request itself is malformed
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// No provider returned any route
    #[error("no routes found")]
    NoRoutesFound,

    /// Routes exist but none satisfies the user's preferences
    #[error("no routes match the given preferences")]
    NoRoutesMatchPreferences,

    /// Anything else
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for PlanError {
    fn from(e: DomainError) -> Self {
        PlanError::InvalidRequest(e.to_string())
    }
}

/// A request for route options between two places.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRequest {
    pub origin: String,
    pub destination: String,

    /// When to travel; `None` means now
    pub travel_date: Option<NaiveDateTime>,

    pub preferences: Option<UserPreferences>,
}

impl PlanRequest {
    /// Create a request to travel now with no preferences.
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            travel_date: None,
            preferences: None,
        }
    }

    pub fn with_travel_date(mut self, travel_date: NaiveDateTime) -> Self {
        self.travel_date = Some(travel_date);
        self
    }

    pub fn with_preferences(mut self, preferences: UserPreferences) -> Self {
        self.preferences = Some(preferences);
        self
    }

    /// Validate the request.
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.origin.trim().is_empty() {
            return Err(PlanError::InvalidRequest("origin is required".to_string()));
        }
        if self.destination.trim().is_empty() {
            return Err(PlanError::InvalidRequest(
                "destination is required".to_string(),
            ));
        }
        if let Some(prefs) = &self.preferences {
            prefs.validate()?;
        }
        Ok(())
    }

    /// Preferences that actually affect the result.
    fn effective_preferences(&self) -> Option<&UserPreferences> {
        self.preferences.as_ref().filter(|p| !p.is_empty())
    }
}

/// The planner's answer: ordered routes plus insights.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePlan {
    pub routes: Vec<RouteOption>,
    pub sustainability_insights: String,
    pub conventional_comparison: ConventionalComparison,
    pub recommendations: Vec<String>,
}

/// Route planner over a set of providers.
pub struct RoutePlanner {
    providers: ProviderSet,
    cache: Arc<PlanCache>,
    model: EmissionModel,
    scorer: Scorer,
    config: PlannerConfig,
    narrative: Option<Arc<dyn NarrativeSource>>,
}

impl RoutePlanner {
    pub fn new(
        providers: ProviderSet,
        cache: Arc<PlanCache>,
        model: EmissionModel,
        config: PlannerConfig,
    ) -> Self {
        let scorer = Scorer::new(&model).with_bonus_cap(config.bonus_cap);
        Self {
            providers,
            cache,
            model,
            scorer,
            config,
            narrative: None,
        }
    }

    /// Attach a source of written commentary.
    pub fn with_narrative(mut self, narrative: Arc<dyn NarrativeSource>) -> Self {
        self.narrative = Some(narrative);
        self
    }

    pub fn cache(&self) -> &PlanCache {
        &self.cache
    }

    pub fn provider_statuses(&self) -> Vec<ProviderStatus> {
        self.providers.statuses()
    }

    /// Plan routes for a request.
    ///
    /// # Errors
    ///
    /// - [`PlanError::InvalidRequest`] for blank places or bad limits
    /// - [`PlanError::NoRoutesFound`] if no provider produced a route
    /// - [`PlanError::NoRoutesMatchPreferences`] if preferences removed every route
    pub async fn plan_routes(&self, request: &PlanRequest) -> Result<Arc<RoutePlan>, PlanError> {
        request.validate()?;

        let preferences = request.effective_preferences();
        let key = fingerprint(
            &request.origin,
            &request.destination,
            request.travel_date,
            preferences,
        );

        if let Some(plan) = self.cache.get(&key).await {
            debug!(origin = %request.origin, destination = %request.destination, "plan cache hit");
            return Ok(plan);
        }
        debug!(origin = %request.origin, destination = %request.destination, "plan cache miss");

        let hints: Vec<_> = preferences
            .map(|p| p.preferred_transport_modes.iter().copied().collect())
            .unwrap_or_default();
        let query = RouteQuery::new(request.origin.trim(), request.destination.trim())
            .with_departure(request.travel_date)
            .with_mode_hints(hints);

        let candidates = self.collect_routes(&query).await;
        let candidate_count = candidates.len();

        let mut routes = apply_preferences(candidates, preferences)?;
        routes.truncate(self.config.max_routes.max(1));

        let narrative = self.narrate(&routes).await;
        let insights = generate_insights(&routes, &self.model, narrative);

        let plan = Arc::new(RoutePlan {
            routes,
            sustainability_insights: insights.summary,
            conventional_comparison: insights.comparison,
            recommendations: insights.recommendations,
        });

        info!(
            origin = %request.origin,
            destination = %request.destination,
            candidates = candidate_count,
            returned = plan.routes.len(),
            "planned routes"
        );

        self.cache.put(key, plan.clone()).await;
        Ok(plan)
    }

    /// Fetch, normalise and score routes from every provider, in provider
    /// order.
    async fn collect_routes(&self, query: &RouteQuery) -> Vec<RouteOption> {
        self.providers
            .fetch_all(query)
            .await
            .iter()
            .flat_map(|batch| normalize_routes(&batch.provider, &batch.routes, query, &self.model))
            .map(|route| {
                let score = self.scorer.score(&route);
                route.with_score(score)
            })
            .collect()
    }

    async fn narrate(&self, routes: &[RouteOption]) -> Option<Narrative> {
        let source = self.narrative.as_ref()?;
        match source.narrate(routes).await {
            Ok(narrative) => Some(narrative),
            Err(e) => {
                warn!(error = %e, "continuing without narrative insights");
                None
            }
        }
    }
}
