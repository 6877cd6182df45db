//! Provider response payloads.
//!
//! Shapes follow the network-analysis REST responses: a `routes` feature set
//! on success, an `error` object on rejection.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::RoutingError;
use crate::polyline::{Geometry, SpatialReference};
use crate::travel_mode::TravelMode;

/// Raw response to a route solve request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderRouteResponse {
    #[serde(default)]
    pub routes: Option<RouteFeatureSet>,
    #[serde(default)]
    pub error: Option<ProviderFault>,
    #[serde(default)]
    pub messages: Vec<ProviderMessage>,
}

impl ProviderRouteResponse {
    /// Turn an embedded provider fault into an error.
    pub fn into_result(self) -> Result<Self, RoutingError> {
        match self.error {
            Some(fault) => Err(fault.into()),
            None => Ok(self),
        }
    }

    pub fn route_count(&self) -> usize {
        self.routes
            .as_ref()
            .map_or(0, |routes| routes.features.len())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteFeatureSet {
    #[serde(rename = "spatialReference", default)]
    pub spatial_reference: Option<SpatialReference>,
    #[serde(default)]
    pub features: Vec<RouteFeature>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteFeature {
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

impl RouteFeature {
    /// A finite numeric attribute, if present.
    pub fn numeric_attribute(&self, name: &str) -> Option<f64> {
        self.attributes
            .get(name)
            .and_then(Value::as_f64)
            .filter(|value| value.is_finite())
    }
}

/// Error object returned by the provider in place of a result.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderFault {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub details: Vec<String>,
}

impl From<ProviderFault> for RoutingError {
    fn from(fault: ProviderFault) -> Self {
        let message = if fault.details.is_empty() {
            fault.message
        } else {
            format!("{} ({})", fault.message, fault.details.join("; "))
        };
        RoutingError::ProviderRejected {
            code: fault.code,
            message,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderMessage {
    #[serde(rename = "type", default)]
    pub kind: i64,
    #[serde(default)]
    pub description: String,
}

/// Service description carrying the supported travel modes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceDescription {
    #[serde(rename = "supportedTravelModes", default)]
    pub supported_travel_modes: Vec<TravelMode>,
    #[serde(default)]
    pub error: Option<ProviderFault>,
}
