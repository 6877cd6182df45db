//! Real Bucharest locations for realistic test fixtures.
//!
//! Coordinates sourced from OpenStreetMap.

use safe_route_planner::model::{Coordinate, Incident};

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng).expect("fixture coordinates are valid")
    }
}

// ============================================================================
// Trip endpoints
// ============================================================================

pub const PIATA_UNIRII: Location = Location::new("Piata Unirii", 44.4268, 26.1025);
pub const PIATA_ROMANA: Location = Location::new("Piata Romana", 44.4470, 26.0973);
pub const GARA_DE_NORD: Location = Location::new("Gara de Nord", 44.4467, 26.0747);
pub const PIATA_VICTORIEI: Location = Location::new("Piata Victoriei", 44.4523, 26.0860);
pub const UNIVERSITATE: Location = Location::new("Universitate", 44.4353, 26.1010);

// ============================================================================
// Incident sites
// ============================================================================

pub const INCIDENT_SITES: &[Location] = &[
    Location::new("Bulevardul Magheru", 44.4410, 26.0989),
    Location::new("Calea Victoriei / Revolutiei", 44.4394, 26.0963),
    Location::new("Piata Amzei", 44.4443, 26.0950),
    Location::new("Bulevardul Dacia", 44.4478, 26.1040),
    Location::new("Piata Rosetti", 44.4364, 26.1062),
    Location::new("Cismigiu", 44.4365, 26.0910),
];

/// One incident per site, cycling through the given types and severities 1..=5.
pub fn incidents_at_sites(types: &[&str]) -> Vec<Incident> {
    INCIDENT_SITES
        .iter()
        .enumerate()
        .map(|(i, site)| {
            let kind = types[i % types.len()];
            let severity = (i % 5) as i64 + 1;
            Incident::new(i as i64 + 1, kind, severity, site.coordinate())
                .expect("fixture incident is valid")
                .with_description(site.name)
        })
        .collect()
}
