//! Normalisation of raw provider routes into `RouteOption`s.
//!
//! Each payload shape has its own mapping into segments. Missing distances
//! or durations become zero and the segment is flagged as estimated; a route
//! is never dropped just because a leg is incomplete.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::domain::{
    Coordinates, DomainError, Location, RouteOption, TransitDetails, TransportMode,
    TransportSegment,
};
use crate::emissions::EmissionModel;

use super::source::RouteQuery;
use super::types::{
    DirectionsLeg, DirectionsRoute, ItineraryLeg, ItineraryPlace, LatLng, RawProviderRoute,
    RouteSummary, TransitItinerary,
};

/// Convert every raw route from one provider, in the order given.
///
/// Routes that can't be converted are logged and skipped rather than
/// failing the whole batch.
pub fn normalize_routes(
    provider: &str,
    raw_routes: &[RawProviderRoute],
    query: &RouteQuery,
    model: &EmissionModel,
) -> Vec<RouteOption> {
    let mut routes = Vec::with_capacity(raw_routes.len());

    for raw in raw_routes {
        match normalize_route(provider, raw, query, model) {
            Ok(route) => routes.push(route),
            Err(e) => {
                warn!(provider, error = %e, "skipping route that could not be normalised");
            }
        }
    }

    routes
}

/// Convert a single raw route.
pub fn normalize_route(
    provider: &str,
    raw: &RawProviderRoute,
    query: &RouteQuery,
    model: &EmissionModel,
) -> Result<RouteOption, DomainError> {
    let (segments, start, end) = match raw {
        RawProviderRoute::Directions(route) => (
            directions_segments(route, query, model),
            route.start_location.and_then(lat_lng),
            route.end_location.and_then(lat_lng),
        ),
        RawProviderRoute::Itinerary(itinerary) => (
            itinerary_segments(itinerary, query, model),
            itinerary.legs.first().and_then(|l| l.from.as_ref()).and_then(place_coordinates),
            itinerary.legs.last().and_then(|l| l.to.as_ref()).and_then(place_coordinates),
        ),
        RawProviderRoute::Summary(summary) => (vec![summary_segment(summary, query, model)], None, None),
    };

    RouteOption::new(
        provider,
        location(&query.origin, start),
        location(&query.destination, end),
        segments,
    )
}

fn directions_segments(
    route: &DirectionsRoute,
    query: &RouteQuery,
    model: &EmissionModel,
) -> Vec<TransportSegment> {
    if route.legs.is_empty() {
        return vec![synthesized_segment(
            None,
            route.duration_seconds.map(seconds_to_minutes),
            route.distance_meters.map(meters_to_km),
            query,
            model,
        )];
    }

    route.legs.iter().map(|leg| directions_leg(leg, model)).collect()
}

fn directions_leg(leg: &DirectionsLeg, model: &EmissionModel) -> TransportSegment {
    // Transit legs name the vehicle in the transit block.
    let mode_str = leg
        .transit
        .as_ref()
        .and_then(|t| t.vehicle_type.as_deref())
        .or(leg.travel_mode.as_deref());
    let (mode, mode_known) = resolve_mode(mode_str);

    let segment = measured_segment(
        mode,
        mode_known,
        leg.duration_seconds.map(seconds_to_minutes),
        leg.distance_meters.map(meters_to_km),
        model,
    );

    match &leg.transit {
        Some(t) => segment.with_transit(TransitDetails {
            line: t.line_short_name.clone().or_else(|| t.line_name.clone()),
            vehicle_type: t.vehicle_type.clone(),
            agency: t.agency_name.clone(),
            departure_stop: t.departure_stop.clone(),
            arrival_stop: t.arrival_stop.clone(),
            departure_time: t.departure_time,
            arrival_time: t.arrival_time,
            stop_count: t.num_stops,
            fare: None,
        }),
        None => segment,
    }
}

fn itinerary_segments(
    itinerary: &TransitItinerary,
    query: &RouteQuery,
    model: &EmissionModel,
) -> Vec<TransportSegment> {
    if itinerary.legs.is_empty() {
        return vec![synthesized_segment(
            None,
            itinerary.duration_seconds.map(seconds_to_minutes),
            None,
            query,
            model,
        )];
    }

    itinerary.legs.iter().map(|leg| itinerary_leg(leg, model)).collect()
}

fn itinerary_leg(leg: &ItineraryLeg, model: &EmissionModel) -> TransportSegment {
    let (mode, mode_known) = resolve_mode(leg.mode.as_deref());

    let departure_time = leg.start_time.and_then(DateTime::<Utc>::from_timestamp_millis);
    let arrival_time = leg.end_time.and_then(DateTime::<Utc>::from_timestamp_millis);

    // Fall back to the leg's timestamps when no duration is given.
    let duration = leg.duration_seconds.map(seconds_to_minutes).or_else(|| {
        let (start, end) = (departure_time?, arrival_time?);
        let secs = (end - start).num_seconds();
        (secs >= 0).then(|| seconds_to_minutes(secs as f64))
    });

    let segment = measured_segment(
        mode,
        mode_known,
        duration,
        leg.distance_meters.map(meters_to_km),
        model,
    );

    if matches!(mode, TransportMode::Walk | TransportMode::Bike) {
        return segment;
    }

    segment.with_transit(TransitDetails {
        line: leg.route_short_name.clone(),
        vehicle_type: leg.mode.clone(),
        agency: leg.agency_name.clone(),
        departure_stop: leg.from.as_ref().and_then(|p| p.name.clone()),
        arrival_stop: leg.to.as_ref().and_then(|p| p.name.clone()),
        departure_time,
        arrival_time,
        stop_count: leg.intermediate_stops,
        fare: leg.fare,
    })
}

fn summary_segment(
    summary: &RouteSummary,
    query: &RouteQuery,
    model: &EmissionModel,
) -> TransportSegment {
    let stated = summary
        .mode
        .as_deref()
        .and_then(TransportMode::from_provider_str);

    synthesized_segment(stated, summary.duration_minutes, summary.distance_km, query, model)
}

/// Build the single segment for a route that came without a leg breakdown.
///
/// The mode is the provider's stated one, else the caller's first mode
/// hint, else car. Anything but a stated mode marks the segment estimated.
fn synthesized_segment(
    stated_mode: Option<TransportMode>,
    duration_minutes: Option<f64>,
    distance_km: Option<f64>,
    query: &RouteQuery,
    model: &EmissionModel,
) -> TransportSegment {
    let (mode, mode_known) = match stated_mode {
        Some(mode) => (mode, true),
        None => (
            query.mode_hints.first().copied().unwrap_or(TransportMode::Car),
            false,
        ),
    };

    measured_segment(mode, mode_known, duration_minutes, distance_km, model)
}

fn measured_segment(
    mode: TransportMode,
    mode_known: bool,
    duration_minutes: Option<f64>,
    distance_km: Option<f64>,
    model: &EmissionModel,
) -> TransportSegment {
    let complete = mode_known && duration_minutes.is_some() && distance_km.is_some();
    let segment = TransportSegment::new(
        mode,
        duration_minutes.unwrap_or(0.0),
        distance_km.unwrap_or(0.0),
        model,
    );

    if complete {
        segment
    } else {
        segment.mark_estimated()
    }
}

/// Resolve a provider mode string. Unknown or missing modes become car, the
/// conservative choice, and are reported as not known.
fn resolve_mode(mode: Option<&str>) -> (TransportMode, bool) {
    match mode.map(|m| (m, TransportMode::from_provider_str(m))) {
        Some((_, Some(mode))) => (mode, true),
        Some((raw, None)) => {
            warn!(mode = raw, "unrecognised provider mode, treating as car");
            (TransportMode::Car, false)
        }
        None => (TransportMode::Car, false),
    }
}

fn location(address: &str, coordinates: Option<Coordinates>) -> Location {
    match coordinates {
        Some(c) => Location::with_coordinates(address, c),
        None => Location::new(address),
    }
}

fn lat_lng(point: LatLng) -> Option<Coordinates> {
    Coordinates::new(point.lat, point.lng).ok()
}

fn place_coordinates(place: &ItineraryPlace) -> Option<Coordinates> {
    Coordinates::new(place.lat?, place.lon?).ok()
}

fn meters_to_km(meters: f64) -> f64 {
    meters / 1000.0
}

fn seconds_to_minutes(seconds: f64) -> f64 {
    seconds / 60.0
}
