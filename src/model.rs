//! Domain values exchanged with the planner.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RoutingError;
use crate::polyline::Polyline;

/// A WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = RoutingError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, RoutingError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(RoutingError::InvalidCoordinate(
                "Invalid coordinate format".to_string(),
            ));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(RoutingError::InvalidCoordinate(
                "Latitude must be between -90 and 90".to_string(),
            ));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(RoutingError::InvalidCoordinate(
                "Longitude must be between -180 and 180".to_string(),
            ));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// (x, y) order as used by provider geometries: (longitude, latitude).
    pub fn xy(&self) -> (f64, f64) {
        (self.longitude, self.latitude)
    }
}

/// Abstract travel mode chosen by the user.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TravelProfile {
    #[default]
    Car,
    Bicycle,
    Pedestrian,
}

impl TravelProfile {
    pub const ALL: [TravelProfile; 3] = [Self::Car, Self::Bicycle, Self::Pedestrian];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Car => "car",
            Self::Bicycle => "bicycle",
            Self::Pedestrian => "pedestrian",
        }
    }
}

impl fmt::Display for TravelProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelProfile {
    type Err = RoutingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|profile| profile.as_str() == normalized)
            .ok_or_else(|| RoutingError::InvalidProfile(value.to_string()))
    }
}

/// A reported incident, as supplied by the incident service.
///
/// Severity is always in 1..=5, whether built with [`Incident::new`] or
/// deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawIncident")]
pub struct Incident {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: u8,
    pub location: Coordinate,
    #[serde(default)]
    pub description: String,
    /// Unix timestamp (seconds).
    #[serde(default)]
    pub reported_at: i64,
}

#[derive(Deserialize)]
struct RawIncident {
    id: i64,
    #[serde(rename = "type")]
    kind: String,
    severity: i64,
    location: Coordinate,
    #[serde(default)]
    description: String,
    #[serde(default)]
    reported_at: i64,
}

impl TryFrom<RawIncident> for Incident {
    type Error = RoutingError;

    fn try_from(raw: RawIncident) -> Result<Self, Self::Error> {
        Ok(Self::new(raw.id, raw.kind, raw.severity, raw.location)?
            .with_description(raw.description)
            .reported_at(raw.reported_at))
    }
}

impl Incident {
    pub fn new(
        id: i64,
        kind: impl Into<String>,
        severity: i64,
        location: Coordinate,
    ) -> Result<Self, RoutingError> {
        if !(1..=5).contains(&severity) {
            return Err(RoutingError::InvalidSeverity(severity));
        }
        Ok(Self {
            id,
            kind: kind.into(),
            severity: severity as u8,
            location,
            description: String::new(),
            reported_at: 0,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn reported_at(mut self, timestamp: i64) -> Self {
        self.reported_at = timestamp;
        self
    }

    /// Case-insensitive membership of this incident's type in `types`.
    pub fn is_one_of(&self, types: &BTreeSet<String>) -> bool {
        let kind = self.kind.trim();
        types.contains(kind)
            || types
                .iter()
                .any(|candidate| candidate.eq_ignore_ascii_case(kind))
    }
}

/// A single routing request made by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRoutePlanRequest")]
pub struct RoutePlanRequest {
    pub start: Coordinate,
    pub end: Coordinate,
    #[serde(default)]
    pub mode: TravelProfile,
    #[serde(default)]
    pub avoid_types: BTreeSet<String>,
}

#[derive(Deserialize)]
struct RawRoutePlanRequest {
    start: Coordinate,
    end: Coordinate,
    #[serde(default)]
    mode: TravelProfile,
    #[serde(default)]
    avoid_types: Vec<String>,
}

impl From<RawRoutePlanRequest> for RoutePlanRequest {
    fn from(raw: RawRoutePlanRequest) -> Self {
        Self::new(raw.start, raw.end, raw.mode, raw.avoid_types)
    }
}

impl RoutePlanRequest {
    /// Avoid types are trimmed, ASCII-lowercased and de-duplicated; blanks are
    /// dropped.
    pub fn new<I>(
        start: Coordinate,
        end: Coordinate,
        mode: TravelProfile,
        avoid_types: I,
    ) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let avoid_types = avoid_types
            .into_iter()
            .map(|kind| kind.as_ref().trim().to_ascii_lowercase())
            .filter(|kind| !kind.is_empty())
            .collect();
        Self {
            start,
            end,
            mode,
            avoid_types,
        }
    }
}

/// A part of the route that could not be fully resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Fallback {
    DistanceUnavailable,
    DurationUnavailable,
    /// Geometry could not be reprojected and is reported as returned.
    UntransformedGeometry,
    /// No travel mode was resolved; the provider applied its default.
    ProviderDefaultTravelMode,
}

/// Normalized outcome of a planning call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteResult {
    /// Geometry as returned by the provider.
    pub path: Polyline,
    /// Geometry in WGS84.
    pub canonical: Polyline,
    pub distance_km: Option<f64>,
    pub duration_minutes: Option<f64>,
    pub distance_label: String,
    pub duration_label: String,
    pub fallbacks: Vec<Fallback>,
}

impl RouteResult {
    pub fn is_degraded(&self) -> bool {
        !self.fallbacks.is_empty()
    }
}
