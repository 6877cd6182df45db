//! Exclusion zones built from incidents the user wants to avoid.
//!
//! Every selected incident yields a hard polygon barrier sized by severity
//! and a companion point barrier with an extreme added cost. Some provider
//! configurations honor point costs more reliably than polygon
//! restrictions, so both are submitted.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use crate::geometry::{
    ClosedPolygon, DEFAULT_VERTEX_COUNT, buffer_circle, severity_to_radius_meters,
};
use crate::model::{Coordinate, Incident};

/// Synthetic traversal cost carried by point barriers.
pub const DETERRENT_COST: f64 = 999_999.0;

/// How strongly the provider must honor a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RestrictionStrength {
    /// Traversal is prohibited.
    Hard,
    /// Traversal is allowed at a prohibitive cost.
    Soft,
}

impl RestrictionStrength {
    /// Provider `BarrierType` attribute: 0 restriction, 2 added cost.
    pub fn barrier_type(&self) -> i32 {
        match self {
            Self::Hard => 0,
            Self::Soft => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneShape {
    Polygon(ClosedPolygon),
    Point(Coordinate),
}

/// A region or point the route should stay out of.
///
/// Built fresh for every planning call and never reused, since incident
/// severity may change between calls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExclusionZone {
    pub source_incident_id: i64,
    pub shape: ZoneShape,
    pub strength: RestrictionStrength,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Barriers {
    pub polygons: Vec<ExclusionZone>,
    pub points: Vec<ExclusionZone>,
}

impl Barriers {
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty() && self.points.is_empty()
    }
}

/// Build barriers for the incidents whose type is in `avoid_types`.
///
/// An empty `avoid_types` means "avoid nothing" and yields no barriers.
pub fn build_barriers(incidents: &[Incident], avoid_types: &BTreeSet<String>) -> Barriers {
    if avoid_types.is_empty() {
        return Barriers::default();
    }

    let mut barriers = Barriers::default();
    for incident in incidents.iter().filter(|incident| incident.is_one_of(avoid_types)) {
        let radius = severity_to_radius_meters(incident.severity);
        barriers.polygons.push(ExclusionZone {
            source_incident_id: incident.id,
            shape: ZoneShape::Polygon(buffer_circle(
                incident.location,
                radius,
                DEFAULT_VERTEX_COUNT,
            )),
            strength: RestrictionStrength::Hard,
        });
        barriers.points.push(ExclusionZone {
            source_incident_id: incident.id,
            shape: ZoneShape::Point(incident.location),
            strength: RestrictionStrength::Soft,
        });
    }

    debug!(
        incidents = incidents.len(),
        polygons = barriers.polygons.len(),
        points = barriers.points.len(),
        "built exclusion zones"
    );
    barriers
}
