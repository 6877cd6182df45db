//! Comprehensive planner tests
//!
//! Tests for barrier selection, travel-mode resolution and caching,
//! response normalization and error propagation.

mod fixtures;

use std::collections::BTreeSet;

use serde_json::json;

use safe_route_planner::barriers::{RestrictionStrength, ZoneShape};
use safe_route_planner::error::RoutingError;
use safe_route_planner::geometry::{DEFAULT_VERTEX_COUNT, haversine_meters};
use safe_route_planner::model::{
    Coordinate, Fallback, Incident, RoutePlanRequest, TravelProfile,
};
use safe_route_planner::planner::RoutePlanner;
use safe_route_planner::travel_mode::{TravelModeCache, TravelModeResolver};

use fixtures::{StubProvider, modes, no_routes};

// ============================================================================
// Test Fixtures
// ============================================================================

fn coord(lat: f64, lng: f64) -> Coordinate {
    Coordinate::new(lat, lng).expect("valid coordinate")
}

fn plan(mode: TravelProfile, avoid: &[&str]) -> RoutePlanRequest {
    RoutePlanRequest::new(
        coord(44.43, 26.10),
        coord(44.45, 26.12),
        mode,
        avoid.iter().copied(),
    )
}

fn scenario_incidents() -> Vec<Incident> {
    vec![
        Incident::new(1, "accident", 5, coord(44.44, 26.11)).unwrap(),
        Incident::new(2, "police", 2, coord(44.46, 26.13)).unwrap(),
    ]
}

// ============================================================================
// Barriers
// ============================================================================

#[test]
fn avoided_accident_becomes_polygon_and_point_barrier() {
    let planner = RoutePlanner::new(StubProvider::new());

    planner
        .plan_route(&plan(TravelProfile::Car, &["accident"]), &scenario_incidents())
        .expect("route planned");

    let request = planner.provider().last_submitted();
    assert_eq!(request.polygon_barriers.len(), 1);
    assert_eq!(request.point_barriers.len(), 1);

    let polygon = &request.polygon_barriers[0];
    assert_eq!(polygon.source_incident_id, 1);
    assert_eq!(polygon.strength, RestrictionStrength::Hard);
    let ZoneShape::Polygon(ring) = &polygon.shape else {
        panic!("expected polygon barrier");
    };
    assert_eq!(ring.len(), DEFAULT_VERTEX_COUNT + 1);
    let center = coord(44.44, 26.11);
    for &(x, y) in ring.ring() {
        let distance = haversine_meters(center, coord(y, x));
        assert!(distance <= 300.0 * 1.05, "vertex {distance} m from incident");
    }

    let point = &request.point_barriers[0];
    assert_eq!(point.source_incident_id, 1);
    assert_eq!(point.shape, ZoneShape::Point(center));
}

#[test]
fn empty_avoid_set_submits_no_barriers() {
    let planner = RoutePlanner::new(StubProvider::new());

    planner
        .plan_route(&plan(TravelProfile::Car, &[]), &scenario_incidents())
        .expect("route planned");

    let request = planner.provider().last_submitted();
    assert!(request.polygon_barriers.is_empty());
    assert!(request.point_barriers.is_empty());
}

#[test]
fn avoid_types_match_regardless_of_case() {
    let planner = RoutePlanner::new(StubProvider::new());
    let incidents = vec![Incident::new(7, "Road_Closure", 3, coord(44.44, 26.11)).unwrap()];

    planner
        .plan_route(&plan(TravelProfile::Car, &["ROAD_CLOSURE "]), &incidents)
        .expect("route planned");

    let request = planner.provider().last_submitted();
    assert_eq!(request.polygon_barriers.len(), 1);
    assert_eq!(request.polygon_barriers[0].source_incident_id, 7);
}

#[test]
fn stops_are_start_then_end() {
    let planner = RoutePlanner::new(StubProvider::new());
    let plan = plan(TravelProfile::Car, &[]);

    planner.plan_route(&plan, &[]).expect("route planned");

    let request = planner.provider().last_submitted();
    assert_eq!(request.stops, [plan.start, plan.end]);
    assert!(!request.find_best_sequence);
    assert!(request.preserve_first_stop);
    assert!(request.preserve_last_stop);
    assert!(!request.return_directions);
}

// ============================================================================
// Travel modes
// ============================================================================

#[test]
fn car_resolves_to_driving_time() {
    let planner = RoutePlanner::new(StubProvider::new());

    let result = planner
        .plan_route(&plan(TravelProfile::Car, &[]), &[])
        .expect("route planned");

    let request = planner.provider().last_submitted();
    assert_eq!(request.travel_mode.map(|mode| mode.name), Some("Driving Time".to_string()));
    assert!(!result.fallbacks.contains(&Fallback::ProviderDefaultTravelMode));
}

#[test]
fn unmatched_profile_uses_first_catalog_entry() {
    let provider = StubProvider::new().with_catalog(modes(&["Trucking Time", "Driving Time"]));
    let planner = RoutePlanner::new(provider);

    planner
        .plan_route(&plan(TravelProfile::Pedestrian, &[]), &[])
        .expect("route planned");

    let request = planner.provider().last_submitted();
    assert_eq!(
        request.travel_mode.map(|mode| mode.name),
        Some("Trucking Time".to_string())
    );
}

#[test]
fn empty_catalog_omits_travel_mode() {
    let planner = RoutePlanner::new(StubProvider::new().with_catalog(Vec::new()));

    let result = planner
        .plan_route(&plan(TravelProfile::Bicycle, &[]), &[])
        .expect("route planned");

    assert!(planner.provider().last_submitted().travel_mode.is_none());
    assert_eq!(result.fallbacks, vec![Fallback::ProviderDefaultTravelMode]);
}

#[test]
fn catalog_failure_degrades_and_is_not_cached() {
    let provider = StubProvider::new().with_catalog_error(RoutingError::ProviderUnavailable {
        url: "https://route.example".to_string(),
        message: "connection reset".to_string(),
    });
    let planner = RoutePlanner::new(provider);

    let result = planner
        .plan_route(&plan(TravelProfile::Car, &[]), &[])
        .expect("route still planned");
    assert!(planner.provider().last_submitted().travel_mode.is_none());
    assert!(result.fallbacks.contains(&Fallback::ProviderDefaultTravelMode));
    assert!(!planner.travel_modes().cache().is_populated());

    planner
        .plan_route(&plan(TravelProfile::Car, &[]), &[])
        .expect("route still planned");
    assert_eq!(planner.provider().catalog_fetches(), 2);
}

#[test]
fn catalog_fetched_once_across_calls() {
    let planner = RoutePlanner::new(StubProvider::new());

    for profile in TravelProfile::ALL {
        planner.plan_route(&plan(profile, &[]), &[]).expect("route planned");
    }

    assert_eq!(planner.provider().catalog_fetches(), 1);
    assert_eq!(planner.provider().submitted().len(), 3);
}

#[test]
fn prewarmed_cache_skips_catalog_fetch() {
    let cache = TravelModeCache::new();
    cache.store(modes(&["Driving Time"]));
    let planner =
        RoutePlanner::with_resolver(StubProvider::new(), TravelModeResolver::with_cache(cache));

    planner.plan_route(&plan(TravelProfile::Car, &[]), &[]).expect("route planned");

    assert_eq!(planner.provider().catalog_fetches(), 0);
    let request = planner.provider().last_submitted();
    assert_eq!(request.travel_mode.expect("mode selected").name, "Driving Time");
}

#[test]
fn invalidate_forces_refetch() {
    let planner = RoutePlanner::new(StubProvider::new());

    planner.plan_route(&plan(TravelProfile::Car, &[]), &[]).unwrap();
    planner.travel_modes().invalidate();
    planner.plan_route(&plan(TravelProfile::Car, &[]), &[]).unwrap();

    assert_eq!(planner.provider().catalog_fetches(), 2);
}

#[test]
fn refresh_replaces_catalog() {
    let planner = RoutePlanner::new(StubProvider::new());

    let catalog = planner
        .travel_modes()
        .refresh(planner.provider())
        .expect("refresh");

    assert_eq!(catalog.len(), 3);
    assert_eq!(planner.provider().catalog_fetches(), 1);
    planner.plan_route(&plan(TravelProfile::Car, &[]), &[]).unwrap();
    assert_eq!(planner.provider().catalog_fetches(), 1);
}

// ============================================================================
// Results and errors
// ============================================================================

#[test]
fn result_labels_are_formatted() {
    let planner = RoutePlanner::new(StubProvider::new());

    let result = planner.plan_route(&plan(TravelProfile::Car, &[]), &[]).unwrap();

    assert_eq!(result.distance_label, "3.21 km");
    assert_eq!(result.duration_label, "8 min");
    assert_eq!(result.canonical.point_count(), 4);
    assert!(!result.is_degraded());
}

#[test]
fn miles_only_response_is_converted() {
    let provider = StubProvider::new().with_response(json!({
        "routes": {"features": [{
            "attributes": {"Total_Miles": 10},
            "geometry": {"paths": [[[26.10, 44.43], [26.12, 44.45]]]}
        }]}
    }));
    let planner = RoutePlanner::new(provider);

    let result = planner.plan_route(&plan(TravelProfile::Car, &[]), &[]).unwrap();

    assert_eq!(result.distance_label, "16.09 km");
    assert_eq!(result.duration_label, "time unavailable");
    assert_eq!(result.fallbacks, vec![Fallback::DurationUnavailable]);
}

#[test]
fn no_distance_attribute_renders_placeholder() {
    let provider = StubProvider::new().with_response(json!({
        "routes": {"features": [{
            "attributes": {"Total_Time": 4.2},
            "geometry": {"paths": [[[26.10, 44.43], [26.12, 44.45]]]}
        }]}
    }));
    let planner = RoutePlanner::new(provider);

    let result = planner.plan_route(&plan(TravelProfile::Car, &[]), &[]).unwrap();

    assert_eq!(result.distance_label, "distance unavailable");
    assert_eq!(result.duration_label, "4 min");
}

#[test]
fn zero_routes_fails_with_no_route_found() {
    let planner = RoutePlanner::new(StubProvider::new().with_response(no_routes()));

    let err = planner
        .plan_route(&plan(TravelProfile::Car, &["accident"]), &scenario_incidents())
        .expect_err("no route");

    assert_eq!(err, RoutingError::NoRouteFound);
}

#[test]
fn missing_credential_fails_before_any_network_call() {
    let planner = RoutePlanner::new(StubProvider::new().without_credential());

    let err = planner
        .plan_route(&plan(TravelProfile::Car, &[]), &[])
        .expect_err("not configured");

    assert_eq!(err, RoutingError::Configuration);
    assert_eq!(planner.provider().catalog_fetches(), 0);
    assert!(planner.provider().submitted().is_empty());
}

#[test]
fn provider_failure_propagates_unchanged() {
    let failure = RoutingError::ProviderUnavailable {
        url: "https://route.example/solve".to_string(),
        message: "timed out".to_string(),
    };
    let planner = RoutePlanner::new(StubProvider::new().with_error(failure.clone()));

    let err = planner
        .plan_route(&plan(TravelProfile::Car, &[]), &[])
        .expect_err("provider failed");

    assert_eq!(err, failure);
    assert_eq!(planner.provider().submitted().len(), 1, "no retry");
}

#[test]
fn provider_rejection_propagates() {
    let planner = RoutePlanner::new(StubProvider::new().with_response(json!({
        "error": {"code": 400, "message": "Invalid value for parameter stops."}
    })));

    let err = planner
        .plan_route(&plan(TravelProfile::Car, &[]), &[])
        .expect_err("rejected");

    assert!(matches!(err, RoutingError::ProviderRejected { code: 400, .. }));
}

// ============================================================================
// Determinism and concurrency
// ============================================================================

#[test]
fn identical_calls_yield_identical_labels() {
    let planner = RoutePlanner::new(StubProvider::new());
    let plan = plan(TravelProfile::Car, &["accident"]);
    let incidents = scenario_incidents();

    let first = planner.plan_route(&plan, &incidents).unwrap();
    let second = planner.plan_route(&plan, &incidents).unwrap();

    assert_eq!(first.distance_label, second.distance_label);
    assert_eq!(first.duration_label, second.duration_label);
    assert_eq!(first, second);

    let submitted = planner.provider().submitted();
    assert_eq!(submitted[0], submitted[1]);
}

#[test]
fn concurrent_calls_share_one_planner() {
    let planner = &RoutePlanner::new(StubProvider::new());
    let plan = &plan(TravelProfile::Car, &["accident"]);
    let incidents = &scenario_incidents();

    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(move || planner.plan_route(plan, incidents)))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("thread completed"))
            .collect()
    });

    assert!(results.iter().all(|result| result.is_ok()));
    assert_eq!(planner.provider().submitted().len(), 4);
    assert!(planner.provider().catalog_fetches() >= 1);
    assert!(planner.travel_modes().cache().is_populated());
}

#[test]
fn incidents_are_not_mutated() {
    let planner = RoutePlanner::new(StubProvider::new());
    let incidents = scenario_incidents();
    let snapshot = incidents.clone();

    planner
        .plan_route(&plan(TravelProfile::Car, &["accident", "police"]), &incidents)
        .unwrap();

    assert_eq!(incidents, snapshot);
    let avoided: BTreeSet<i64> = planner
        .provider()
        .last_submitted()
        .polygon_barriers
        .iter()
        .map(|zone| zone.source_incident_id)
        .collect();
    assert_eq!(avoided, BTreeSet::from([1, 2]));
}
