//! Choices offered to the user before planning.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::warn;

use crate::model::{Incident, TravelProfile};

/// Incident categories accepted by the incident service.
pub const KNOWN_INCIDENT_TYPES: &[&str] = &[
    "accident",
    "construction",
    "traffic_jam",
    "road_closure",
    "hazard",
    "police",
    "other",
];

/// Types avoided unless the user says otherwise.
pub const DEFAULT_AVOID_TYPES: &[&str] = &["accident", "road_closure", "construction"];

pub fn is_known_incident_type(kind: &str) -> bool {
    KNOWN_INCIDENT_TYPES.contains(&kind)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutingOptions {
    pub travel_modes: Vec<TravelProfile>,
    pub available_incident_types: Vec<String>,
    pub default_avoid_types: Vec<String>,
}

impl RoutingOptions {
    /// Options for the incident types currently present.
    ///
    /// Default avoid types are limited to those present, so the user is
    /// never pre-selected into a category with nothing to avoid. Unknown
    /// types are still offered, with a warning.
    pub fn from_incidents(incidents: &[Incident]) -> Self {
        let mut travel_modes = TravelProfile::ALL.to_vec();
        travel_modes.sort_by_key(TravelProfile::as_str);

        let available: BTreeSet<String> = incidents
            .iter()
            .map(|incident| incident.kind.clone())
            .collect();
        for kind in available.iter().filter(|kind| !is_known_incident_type(kind)) {
            warn!(incident_type = %kind, "Unknown incident type offered as routing option");
        }
        let default_avoid_types = available
            .iter()
            .filter(|kind| DEFAULT_AVOID_TYPES.contains(&kind.as_str()))
            .cloned()
            .collect();

        Self {
            travel_modes,
            available_incident_types: available.into_iter().collect(),
            default_avoid_types,
        }
    }
}
