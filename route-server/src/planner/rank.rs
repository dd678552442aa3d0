//! Preference filtering and ordering of candidate routes.

use std::cmp::Ordering;

use tracing::info;

use crate::domain::{RouteOption, UserPreferences};

use super::plan::PlanError;

/// Drop routes that exceed the user's time or budget limits.
///
/// Limits are inclusive: a route exactly at the limit is kept. Without
/// preferences nothing is removed.
pub fn filter_by_preferences(
    routes: Vec<RouteOption>,
    preferences: Option<&UserPreferences>,
) -> Vec<RouteOption> {
    let Some(prefs) = preferences else {
        return routes;
    };

    routes
        .into_iter()
        .filter(|route| {
            let within_time = prefs
                .max_travel_time
                .is_none_or(|max| route.total_duration_minutes() <= f64::from(max));
            let within_budget = prefs
                .budget_limit
                .is_none_or(|max| route.total_cost() <= max);
            within_time && within_budget
        })
        .collect()
}

/// Order routes best-first.
///
/// With `prioritize_sustainability` routes are ordered by descending score,
/// otherwise by ascending duration. The sort is stable, so ties keep the
/// order in which providers yielded them.
pub fn sort_routes(routes: &mut [RouteOption], preferences: Option<&UserPreferences>) {
    let by_sustainability = preferences.is_some_and(|p| p.prioritize_sustainability);

    if by_sustainability {
        routes.sort_by(|a, b| b.sustainability_score().cmp(&a.sustainability_score()));
    } else {
        routes.sort_by(by_duration);
    }
}

fn by_duration(a: &RouteOption, b: &RouteOption) -> Ordering {
    a.total_duration_minutes()
        .total_cmp(&b.total_duration_minutes())
}

/// Filter then sort.
///
/// # Errors
///
/// - [`PlanError::NoRoutesFound`] if `routes` is empty to begin with
/// - [`PlanError::NoRoutesMatchPreferences`] if every route was filtered out
pub fn apply_preferences(
    routes: Vec<RouteOption>,
    preferences: Option<&UserPreferences>,
) -> Result<Vec<RouteOption>, PlanError> {
    if routes.is_empty() {
        return Err(PlanError::NoRoutesFound);
    }

    let candidates = routes.len();
    let mut kept = filter_by_preferences(routes, preferences);

    if kept.is_empty() {
        info!(candidates, "no route satisfies the preferences");
        return Err(PlanError::NoRoutesMatchPreferences);
    }

    sort_routes(&mut kept, preferences);
    Ok(kept)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::{Location, TransportMode, TransportSegment};
    use crate::emissions::EmissionModel;
    use proptest::prelude::*;

    fn arb_route() -> impl Strategy<Value = RouteOption> {
        (
            prop::sample::select(TransportMode::ALL.to_vec()),
            // Whole minutes so that equal sort keys actually occur.
            0u32..20,
            1.0f64..500.0,
            0u8..=10,
        )
            .prop_map(|(mode, mins, km, score)| {
                let seg = TransportSegment::new(
                    mode,
                    f64::from(mins) * 15.0,
                    km,
                    &EmissionModel::default(),
                );
                RouteOption::new("prop", Location::new("A"), Location::new("B"), vec![seg])
                    .unwrap()
                    .with_score(score * 10)
            })
    }

    proptest! {
        /// Nothing longer than the time limit survives, and nothing within
        /// it is dropped.
        #[test]
        fn filter_respects_max_travel_time(
            routes in prop::collection::vec(arb_route(), 0..20),
            limit in 1u32..300,
        ) {
            let prefs = UserPreferences {
                max_travel_time: Some(limit),
                ..Default::default()
            };
            let expected = routes
                .iter()
                .filter(|r| r.total_duration_minutes() <= f64::from(limit))
                .count();

            let kept = filter_by_preferences(routes, Some(&prefs));
            prop_assert_eq!(kept.len(), expected);
            for route in &kept {
                prop_assert!(route.total_duration_minutes() <= f64::from(limit));
            }
        }

        /// Routes with equal keys keep their relative input order.
        #[test]
        fn sort_is_stable(
            routes in prop::collection::vec(arb_route(), 0..20),
            by_score in any::<bool>(),
        ) {
            let prefs = UserPreferences {
                prioritize_sustainability: by_score,
                ..Default::default()
            };
            let input_pos = |id: &str| routes.iter().position(|r| r.id() == id);

            let mut sorted = routes.clone();
            sort_routes(&mut sorted, Some(&prefs));
            prop_assert_eq!(sorted.len(), routes.len());

            for pair in sorted.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                let tied = if by_score {
                    a.sustainability_score() == b.sustainability_score()
                } else {
                    a.total_duration_minutes() == b.total_duration_minutes()
                };
                if tied {
                    prop_assert!(input_pos(a.id()) < input_pos(b.id()));
                }
            }
        }

        /// The output is ordered by the chosen key.
        #[test]
        fn sort_orders_by_key(routes in prop::collection::vec(arb_route(), 0..20)) {
            let mut by_time = routes.clone();
            sort_routes(&mut by_time, None);
            for pair in by_time.windows(2) {
                prop_assert!(pair[0].total_duration_minutes() <= pair[1].total_duration_minutes());
            }

            let prefs = UserPreferences {
                prioritize_sustainability: true,
                ..Default::default()
            };
            let mut by_score = routes;
            sort_routes(&mut by_score, Some(&prefs));
            for pair in by_score.windows(2) {
                prop_assert!(pair[0].sustainability_score() >= pair[1].sustainability_score());
            }
        }
    }
}
