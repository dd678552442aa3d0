//! Sustainability insights and the comparison against driving.
//!
//! The numeric parts here are always produced. A [`NarrativeSource`] may add
//! a written summary and tips on top; if it is missing or fails, the plan
//! carries the numeric insights alone.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::RouteOption;
use crate::emissions::EmissionModel;

/// Maximum number of recommendation strings in a plan.
pub const MAX_RECOMMENDATIONS: usize = 8;

/// How the best route compares with driving the same distance.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConventionalComparison {
    pub best_route_id: Option<String>,
    pub best_route_score: u8,
    pub baseline_emission_kg: f64,
    pub best_route_emission_kg: f64,
    pub carbon_saved_kg: f64,
    pub improvement_percent: f64,
}

/// Free-text commentary from an external narrative generator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Narrative {
    pub summary: Option<String>,
    pub tips: Vec<String>,
}

/// Error from a narrative source. Never surfaced to callers.
#[derive(Debug, thiserror::Error)]
#[error("narrative unavailable: {0}")]
pub struct NarrativeError(pub String);

/// Produces written commentary for a set of routes.
#[async_trait]
pub trait NarrativeSource: Send + Sync {
    async fn narrate(&self, routes: &[RouteOption]) -> Result<Narrative, NarrativeError>;
}

/// Everything the insights step contributes to a plan.
#[derive(Debug, Clone, PartialEq)]
pub struct Insights {
    pub summary: String,
    pub comparison: ConventionalComparison,
    pub recommendations: Vec<String>,
}

/// The route with the highest score; the first one wins a tie.
pub fn best_route(routes: &[RouteOption]) -> Option<&RouteOption> {
    routes.iter().fold(None, |best, route| match best {
        Some(b) if b.sustainability_score() >= route.sustainability_score() => Some(b),
        _ => Some(route),
    })
}

/// Compare `best` against covering the same distance by car.
///
/// The improvement is clamped to [0, 100] and is zero when the baseline is
/// zero.
pub fn conventional_comparison(
    best: Option<&RouteOption>,
    model: &EmissionModel,
) -> ConventionalComparison {
    let Some(best) = best else {
        return ConventionalComparison::default();
    };

    let baseline = model.baseline_emission(best.total_distance_km());
    let actual = best.total_carbon_kg();

    let improvement_percent = if baseline > 0.0 {
        ((baseline - actual) / baseline * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };

    ConventionalComparison {
        best_route_id: Some(best.id().to_string()),
        best_route_score: best.sustainability_score(),
        baseline_emission_kg: baseline,
        best_route_emission_kg: actual,
        carbon_saved_kg: (baseline - actual).max(0.0),
        improvement_percent,
    }
}

/// Build the insights for an ordered, non-empty set of routes.
///
/// Recommendations are narrative tips first, then aggregate statistics,
/// then per-route notes, cut off at [`MAX_RECOMMENDATIONS`].
pub fn generate_insights(
    routes: &[RouteOption],
    model: &EmissionModel,
    narrative: Option<Narrative>,
) -> Insights {
    let best = best_route(routes);
    let comparison = conventional_comparison(best, model);
    let narrative = narrative.unwrap_or_default();

    let summary = narrative
        .summary
        .clone()
        .unwrap_or_else(|| numeric_summary(best, &comparison));

    let mut recommendations = narrative.tips;
    recommendations.extend(aggregate_stats(routes));
    recommendations.extend(route_notes(routes, &comparison));
    recommendations.truncate(MAX_RECOMMENDATIONS);

    Insights {
        summary,
        comparison,
        recommendations,
    }
}

fn numeric_summary(best: Option<&RouteOption>, comparison: &ConventionalComparison) -> String {
    let Some(best) = best else {
        return "No routes to compare.".to_string();
    };

    if comparison.improvement_percent > 0.0 {
        format!(
            "The most sustainable option ({}) scores {}/100 and emits {:.1}% less CO2 than driving, saving {:.2} kg.",
            best.mode_summary(),
            best.sustainability_score(),
            comparison.improvement_percent,
            comparison.carbon_saved_kg,
        )
    } else {
        format!(
            "The most sustainable option ({}) scores {}/100 and emits no less CO2 than driving.",
            best.mode_summary(),
            best.sustainability_score(),
        )
    }
}

fn aggregate_stats(routes: &[RouteOption]) -> Vec<String> {
    if routes.is_empty() {
        return Vec::new();
    }

    let count = routes.len() as f64;
    let average_score = routes
        .iter()
        .map(|r| f64::from(r.sustainability_score()))
        .sum::<f64>()
        / count;
    let total_footprint: f64 = routes.iter().map(|r| r.total_carbon_kg()).sum();

    vec![
        format!(
            "Average sustainability score across {} routes: {:.0}/100.",
            routes.len(),
            average_score
        ),
        format!("Combined footprint of all options: {total_footprint:.2} kg CO2e."),
    ]
}

fn route_notes(routes: &[RouteOption], comparison: &ConventionalComparison) -> Vec<String> {
    let mut notes = Vec::new();

    if let Some(best_id) = &comparison.best_route_id
        && let Some(best) = routes.iter().find(|r| r.id() == best_id)
        && let Some(fastest) = routes
            .iter()
            .min_by(|a, b| a.total_duration_minutes().total_cmp(&b.total_duration_minutes()))
        && fastest.id() != best.id()
    {
        let extra = best.total_duration_minutes() - fastest.total_duration_minutes();
        let saved = fastest.total_carbon_kg() - best.total_carbon_kg();
        if extra > 0.0 && saved > 0.0 {
            notes.push(format!(
                "Taking {} instead of {} adds {:.0} minutes and saves {:.2} kg CO2e.",
                best.mode_summary(),
                fastest.mode_summary(),
                extra,
                saved,
            ));
        }
    }

    for route in routes {
        let share = route.low_emission_share();
        if share >= 0.5 {
            notes.push(format!(
                "{}: {:.0}% of the distance is on low-emission modes.",
                route.mode_summary(),
                share * 100.0
            ));
        }
        if route.is_estimated() {
            notes.push(format!(
                "{}: figures are partly estimated from incomplete provider data.",
                route.mode_summary()
            ));
        }
    }

    notes
}
