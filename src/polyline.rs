//! Polyline representation for route geometries.
//!
//! Provider geometries arrive either as JSON objects or, from some clients,
//! as a JSON string holding the same object. [`Geometry`] accepts both and
//! [`Geometry::into_polyline`] normalizes to a [`Polyline`] at the boundary.

use serde::{Deserialize, Serialize};

use crate::error::RoutingError;
use crate::model::Coordinate;

/// WGS84 latitude/longitude.
pub const WGS84_WKID: u32 = 4326;

/// Spatial reference attached to provider geometries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpatialReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wkid: Option<u32>,
    #[serde(
        rename = "latestWkid",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub latest_wkid: Option<u32>,
}

impl SpatialReference {
    pub fn wgs84() -> Self {
        Self {
            wkid: Some(WGS84_WKID),
            latest_wkid: Some(WGS84_WKID),
        }
    }

    /// Preferred code: the latest wkid when present.
    pub fn code(&self) -> Option<u32> {
        self.latest_wkid.or(self.wkid)
    }

    pub fn is_wgs84(&self) -> bool {
        self.wkid == Some(WGS84_WKID) || self.latest_wkid == Some(WGS84_WKID)
    }
}

/// A route geometry made of one or more disjoint paths.
///
/// Points are stored in (x, y) order; for WGS84 that is (longitude, latitude).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PolylineJson", into = "PolylineJson")]
pub struct Polyline {
    paths: Vec<Vec<(f64, f64)>>,
    spatial_reference: Option<SpatialReference>,
}

#[derive(Serialize, Deserialize)]
struct PolylineJson {
    #[serde(default)]
    paths: Vec<Vec<Vec<f64>>>,
    #[serde(
        rename = "spatialReference",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    spatial_reference: Option<SpatialReference>,
}

impl From<PolylineJson> for Polyline {
    // Z and M values are dropped; malformed points are skipped.
    fn from(json: PolylineJson) -> Self {
        let paths = json
            .paths
            .into_iter()
            .map(|path| {
                path.into_iter()
                    .filter_map(|point| match point.as_slice() {
                        [x, y, ..] if x.is_finite() && y.is_finite() => Some((*x, *y)),
                        _ => None,
                    })
                    .collect::<Vec<_>>()
            })
            .filter(|path| !path.is_empty())
            .collect();
        Self {
            paths,
            spatial_reference: json.spatial_reference,
        }
    }
}

impl From<Polyline> for PolylineJson {
    fn from(polyline: Polyline) -> Self {
        Self {
            paths: polyline
                .paths
                .into_iter()
                .map(|path| path.into_iter().map(|(x, y)| vec![x, y]).collect())
                .collect(),
            spatial_reference: polyline.spatial_reference,
        }
    }
}

impl Polyline {
    pub fn new(paths: Vec<Vec<(f64, f64)>>, spatial_reference: Option<SpatialReference>) -> Self {
        Self {
            paths,
            spatial_reference,
        }
    }

    /// A single-path WGS84 polyline through the given coordinates.
    pub fn from_coordinates(coordinates: &[Coordinate]) -> Self {
        Self::new(
            vec![coordinates.iter().map(Coordinate::xy).collect()],
            Some(SpatialReference::wgs84()),
        )
    }

    pub fn paths(&self) -> &[Vec<(f64, f64)>] {
        &self.paths
    }

    pub fn point_count(&self) -> usize {
        self.paths.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.point_count() == 0
    }

    pub fn spatial_reference(&self) -> Option<SpatialReference> {
        self.spatial_reference
    }

    /// Use `fallback` when the geometry carries no spatial reference of its own.
    pub fn or_spatial_reference(mut self, fallback: Option<SpatialReference>) -> Self {
        if self.spatial_reference.is_none() {
            self.spatial_reference = fallback;
        }
        self
    }

    /// Apply `transform` to every point, tagging the result with `target`.
    pub fn map_points<F>(&self, target: SpatialReference, transform: F) -> Self
    where
        F: Fn(f64, f64) -> (f64, f64),
    {
        let paths = self
            .paths
            .iter()
            .map(|path| path.iter().map(|&(x, y)| transform(x, y)).collect())
            .collect();
        Self::new(paths, Some(target))
    }

    /// WGS84 points as coordinates, skipping any outside the valid range.
    pub fn to_coordinates(&self) -> Vec<Vec<Coordinate>> {
        self.paths
            .iter()
            .map(|path| {
                path.iter()
                    .filter_map(|&(x, y)| Coordinate::new(y, x).ok())
                    .collect()
            })
            .collect()
    }
}

/// Geometry input that is either already structured or still serialized.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Geometry {
    Constructed(Polyline),
    Serialized(String),
}

impl Geometry {
    pub fn into_polyline(self) -> Result<Polyline, RoutingError> {
        match self {
            Self::Constructed(polyline) => Ok(polyline),
            Self::Serialized(json) => serde_json::from_str(&json)
                .map_err(|err| RoutingError::payload(format!("route geometry: {err}"))),
        }
    }
}

impl From<Polyline> for Geometry {
    fn from(polyline: Polyline) -> Self {
        Self::Constructed(polyline)
    }
}
