//! Deterministic stand-in for the routing service.
//!
//! Returns pre-configured responses and records every request it receives,
//! so tests can assert on what the planner submitted.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::{Value, json};

use safe_route_planner::error::RoutingError;
use safe_route_planner::request::ProviderRouteRequest;
use safe_route_planner::response::ProviderRouteResponse;
use safe_route_planner::traits::RouteProvider;
use safe_route_planner::travel_mode::TravelMode;

pub struct StubProvider {
    credential: bool,
    catalog: Result<Vec<TravelMode>, RoutingError>,
    response: Result<Value, RoutingError>,
    catalog_fetches: AtomicUsize,
    submitted: Mutex<Vec<ProviderRouteRequest>>,
}

impl StubProvider {
    /// A provider with a car/walking catalog that returns [`sample_route`].
    pub fn new() -> Self {
        Self {
            credential: true,
            catalog: Ok(modes(&["Walking Time", "Driving Time", "Driving Distance"])),
            response: Ok(sample_route()),
            catalog_fetches: AtomicUsize::new(0),
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub fn without_credential(mut self) -> Self {
        self.credential = false;
        self
    }

    pub fn with_catalog(mut self, catalog: Vec<TravelMode>) -> Self {
        self.catalog = Ok(catalog);
        self
    }

    pub fn with_catalog_error(mut self, error: RoutingError) -> Self {
        self.catalog = Err(error);
        self
    }

    pub fn with_response(mut self, response: Value) -> Self {
        self.response = Ok(response);
        self
    }

    pub fn with_error(mut self, error: RoutingError) -> Self {
        self.response = Err(error);
        self
    }

    pub fn catalog_fetches(&self) -> usize {
        self.catalog_fetches.load(Ordering::SeqCst)
    }

    pub fn submitted(&self) -> Vec<ProviderRouteRequest> {
        self.submitted.lock().expect("submitted lock").clone()
    }

    pub fn last_submitted(&self) -> ProviderRouteRequest {
        self.submitted()
            .pop()
            .expect("at least one request submitted")
    }
}

impl RouteProvider for StubProvider {
    fn has_credential(&self) -> bool {
        self.credential
    }

    fn fetch_travel_modes(&self) -> Result<Vec<TravelMode>, RoutingError> {
        self.catalog_fetches.fetch_add(1, Ordering::SeqCst);
        self.catalog.clone()
    }

    fn submit(
        &self,
        request: &ProviderRouteRequest,
    ) -> Result<ProviderRouteResponse, RoutingError> {
        self.submitted
            .lock()
            .expect("submitted lock")
            .push(request.clone());
        let body = self.response.clone()?;
        let response: ProviderRouteResponse =
            serde_json::from_value(body).expect("stub response is valid json");
        response.into_result()
    }
}

pub fn modes(names: &[&str]) -> Vec<TravelMode> {
    names.iter().map(|name| TravelMode::named(*name)).collect()
}

/// A single WGS84 route of 3.21 km and 7.6 minutes.
pub fn sample_route() -> Value {
    json!({
        "routes": {
            "spatialReference": {"wkid": 4326, "latestWkid": 4326},
            "features": [{
                "attributes": {
                    "Name": "Start - End",
                    "Total_Kilometers": 3.2149,
                    "Total_Miles": 1.9976,
                    "Total_TravelTime": 7.6,
                    "Total_Time": 7.6
                },
                "geometry": {
                    "paths": [[[26.10, 44.43], [26.105, 44.433], [26.115, 44.447], [26.12, 44.45]]]
                }
            }]
        }
    })
}

pub fn no_routes() -> Value {
    json!({
        "routes": {"spatialReference": {"wkid": 4326}, "features": []},
        "messages": [{"type": 50, "description": "No solution found."}]
    })
}
