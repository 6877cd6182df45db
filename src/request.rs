//! Route solve request assembly and wire encoding.

use serde_json::{Value, json};

use crate::barriers::{Barriers, DETERRENT_COST, ExclusionZone, ZoneShape};
use crate::error::RoutingError;
use crate::model::{Coordinate, RoutePlanRequest};
use crate::polyline::WGS84_WKID;
use crate::travel_mode::TravelMode;

/// Geometry detail requested for returned routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputLines {
    None,
    Straight,
    TrueShape,
}

impl OutputLines {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "esriNAOutputLineNone",
            Self::Straight => "esriNAOutputLineStraight",
            Self::TrueShape => "esriNAOutputLineTrueShape",
        }
    }
}

/// A fully assembled point-to-point solve request.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRouteRequest {
    /// Start then end. Order matters to the provider.
    pub stops: [Coordinate; 2],
    /// `None` lets the provider apply its default mode.
    pub travel_mode: Option<TravelMode>,
    pub polygon_barriers: Vec<ExclusionZone>,
    pub point_barriers: Vec<ExclusionZone>,
    pub return_routes: bool,
    pub return_directions: bool,
    pub output_lines: OutputLines,
    pub out_wkid: u32,
    pub find_best_sequence: bool,
    pub preserve_first_stop: bool,
    pub preserve_last_stop: bool,
}

pub fn assemble_request(
    plan: &RoutePlanRequest,
    barriers: Barriers,
    travel_mode: Option<TravelMode>,
) -> ProviderRouteRequest {
    ProviderRouteRequest {
        stops: [plan.start, plan.end],
        travel_mode,
        polygon_barriers: barriers.polygons,
        point_barriers: barriers.points,
        return_routes: true,
        return_directions: false,
        output_lines: OutputLines::TrueShape,
        out_wkid: WGS84_WKID,
        find_best_sequence: false,
        preserve_first_stop: true,
        preserve_last_stop: true,
    }
}

impl ProviderRouteRequest {
    /// Form parameters for the solve endpoint, excluding the credential.
    pub fn to_form_params(&self) -> Result<Vec<(&'static str, String)>, RoutingError> {
        let mut params = vec![
            ("f", "json".to_string()),
            ("stops", self.stops_json().to_string()),
            ("returnRoutes", self.return_routes.to_string()),
            ("returnDirections", self.return_directions.to_string()),
            ("outputLines", self.output_lines.as_str().to_string()),
            ("outSR", self.out_wkid.to_string()),
            ("findBestSequence", self.find_best_sequence.to_string()),
            ("preserveFirstStop", self.preserve_first_stop.to_string()),
            ("preserveLastStop", self.preserve_last_stop.to_string()),
        ];

        if let Some(mode) = &self.travel_mode {
            let encoded = serde_json::to_string(mode)
                .map_err(|err| RoutingError::payload(format!("travel mode: {err}")))?;
            params.push(("travelMode", encoded));
        }
        if !self.polygon_barriers.is_empty() {
            params.push((
                "polygonBarriers",
                feature_set(&self.polygon_barriers).to_string(),
            ));
        }
        if !self.point_barriers.is_empty() {
            params.push(("barriers", feature_set(&self.point_barriers).to_string()));
        }

        Ok(params)
    }

    fn stops_json(&self) -> Value {
        let [start, end] = self.stops;
        json!({
            "spatialReference": { "wkid": WGS84_WKID },
            "features": [
                { "geometry": point_json(start), "attributes": { "Name": "Start" } },
                { "geometry": point_json(end), "attributes": { "Name": "End" } },
            ],
        })
    }
}

fn point_json(location: Coordinate) -> Value {
    json!({ "x": location.longitude(), "y": location.latitude() })
}

fn feature_set(zones: &[ExclusionZone]) -> Value {
    let features: Vec<Value> = zones.iter().map(zone_feature).collect();
    json!({
        "spatialReference": { "wkid": WGS84_WKID },
        "features": features,
    })
}

fn zone_feature(zone: &ExclusionZone) -> Value {
    let name = format!("incident-{}", zone.source_incident_id);
    let barrier_type = zone.strength.barrier_type();
    match &zone.shape {
        ZoneShape::Polygon(polygon) => {
            let ring: Vec<[f64; 2]> = polygon.ring().iter().map(|&(x, y)| [x, y]).collect();
            json!({
                "geometry": { "rings": [ring] },
                "attributes": { "Name": name, "BarrierType": barrier_type },
            })
        }
        ZoneShape::Point(location) => json!({
            "geometry": point_json(*location),
            "attributes": {
                "Name": name,
                "BarrierType": barrier_type,
                "Attr_Minutes": DETERRENT_COST,
                "Attr_TravelTime": DETERRENT_COST,
            },
        }),
    }
}
