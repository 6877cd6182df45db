//! Safety scoring of a planned route against nearby incidents.
//!
//! A route starts at 100 points and loses points for every incident within
//! [`MAX_REPORT_DISTANCE_KM`] of any of its paths. Closer and more severe
//! incidents cost more, and incidents of a type the user asked to avoid
//! cost half again as much. Scores of 70 and above are considered safe.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::model::{Coordinate, Incident};
use crate::polyline::Polyline;

/// Within this distance an incident is effectively on the route.
pub const CRITICAL_DISTANCE_KM: f64 = 0.05;
pub const DANGER_DISTANCE_KM: f64 = 0.2;
pub const WARNING_DISTANCE_KM: f64 = 0.5;
/// Incidents further away than this are ignored.
pub const MAX_REPORT_DISTANCE_KM: f64 = 1.0;

const KM_PER_DEGREE: f64 = 111.0;
const AVOIDED_TYPE_MULTIPLIER: f64 = 1.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncidentImpact {
    pub incident_id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: u8,
    /// Distance to the nearest path segment, rounded to meters.
    pub distance_km: f64,
    pub impact_score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SafetyReport {
    /// 0 (very dangerous) to 100 (no incidents nearby).
    pub score: u8,
    /// Nearest first.
    pub impacts: Vec<IncidentImpact>,
}

impl SafetyReport {
    pub fn is_safe(&self) -> bool {
        self.score >= 70
    }
}

/// Score `route` (WGS84) against `incidents`.
///
/// The caller decides which incidents count, e.g. only active ones.
pub fn score_route(
    route: &Polyline,
    incidents: &[Incident],
    avoid_types: &BTreeSet<String>,
) -> SafetyReport {
    let mut impacts = Vec::new();
    let mut total_impact = 0.0;

    for incident in incidents {
        let distance = route
            .paths()
            .iter()
            .filter_map(|path| min_distance_to_path_km(path, incident.location))
            .reduce(f64::min);
        let Some(distance) = distance.filter(|&km| km <= MAX_REPORT_DISTANCE_KM) else {
            continue;
        };

        let avoided = incident.is_one_of(avoid_types);
        let score = impact_score(distance, incident.severity, avoided);
        if score > 0 {
            total_impact += f64::from(score);
            impacts.push(IncidentImpact {
                incident_id: incident.id,
                kind: incident.kind.clone(),
                severity: incident.severity,
                distance_km: (distance * 1000.0).round() / 1000.0,
                impact_score: score,
            });
        }
    }

    impacts.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    let score = (100.0 - total_impact).round().clamp(0.0, 100.0) as u8;

    SafetyReport { score, impacts }
}

/// Points deducted for one incident at `distance_km` from the route.
pub fn impact_score(distance_km: f64, severity: u8, avoided_type: bool) -> u32 {
    // 0.6 at severity 1 up to 1.4 at severity 5
    let severity_multiplier = 0.4 + f64::from(severity) * 0.2;

    let base_impact = if distance_km <= CRITICAL_DISTANCE_KM {
        20.0
    } else if distance_km <= DANGER_DISTANCE_KM {
        let ratio =
            (distance_km - CRITICAL_DISTANCE_KM) / (DANGER_DISTANCE_KM - CRITICAL_DISTANCE_KM);
        15.0 - ratio * 10.0
    } else if distance_km <= WARNING_DISTANCE_KM {
        let ratio = (distance_km - DANGER_DISTANCE_KM) / (WARNING_DISTANCE_KM - DANGER_DISTANCE_KM);
        5.0 - ratio * 4.0
    } else {
        let ratio = ((distance_km - WARNING_DISTANCE_KM)
            / (MAX_REPORT_DISTANCE_KM - WARNING_DISTANCE_KM))
            .min(1.0);
        1.0 - ratio
    };

    let mut impact = base_impact * severity_multiplier;
    if avoided_type {
        impact *= AVOIDED_TYPE_MULTIPLIER;
    }
    impact.round().max(0.0) as u32
}

/// Minimum distance from `location` to any segment of `path` (x = lon, y = lat).
fn min_distance_to_path_km(path: &[(f64, f64)], location: Coordinate) -> Option<f64> {
    path.windows(2)
        .map(|segment| point_to_segment_km(location.xy(), segment[0], segment[1]))
        .reduce(f64::min)
}

fn point_to_segment_km(point: (f64, f64), start: (f64, f64), end: (f64, f64)) -> f64 {
    let ref_lat = (point.1 + start.1 + end.1) / 3.0;
    let (px, py) = project_to_planar(point, ref_lat);
    let (ax, ay) = project_to_planar(start, ref_lat);
    let (bx, by) = project_to_planar(end, ref_lat);

    let (dx, dy) = (bx - ax, by - ay);
    if dx == 0.0 && dy == 0.0 {
        return (px - ax).hypot(py - ay);
    }

    let t = (((px - ax) * dx + (py - ay) * dy) / (dx * dx + dy * dy)).clamp(0.0, 1.0);
    let (cx, cy) = (ax + t * dx, ay + t * dy);
    (px - cx).hypot(py - cy)
}

/// Local planar approximation in kilometers around `ref_lat`.
fn project_to_planar((lon, lat): (f64, f64), ref_lat: f64) -> (f64, f64) {
    let km_per_deg_lon = KM_PER_DEGREE * ref_lat.to_radians().cos();
    (lon * km_per_deg_lon, lat * KM_PER_DEGREE)
}
