//! Geometry helpers for exclusion zones and reprojection.
//!
//! Buffers use a local-latitude degree approximation rather than a geodesic
//! buffer. Zones only need to be large enough, and the error stays below 1%
//! at mid latitudes.

use std::f64::consts::{FRAC_PI_2, TAU};

use serde::Serialize;

use crate::model::Coordinate;

/// Meters spanned by one degree of latitude.
pub const METERS_PER_DEGREE_LATITUDE: f64 = 111_320.0;

/// Default number of distinct vertices in a buffered circle.
pub const DEFAULT_VERTEX_COUNT: usize = 32;

/// Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Sphere radius used by Web Mercator.
const WEB_MERCATOR_RADIUS_M: f64 = 6_378_137.0;

/// Spatial reference codes for spherical Web Mercator.
const WEB_MERCATOR_WKIDS: [u32; 4] = [102100, 3857, 102113, 900913];

/// A closed polygon ring in WGS84, stored as (x, y) = (longitude, latitude).
///
/// The first and last vertex are identical. Vertices run clockwise, which
/// is the exterior-ring orientation routing services expect.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClosedPolygon {
    ring: Vec<(f64, f64)>,
}

impl ClosedPolygon {
    pub fn ring(&self) -> &[(f64, f64)] {
        &self.ring
    }

    /// Number of vertices including the closing one.
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.ring.len() > 1 && self.ring.first() == self.ring.last()
    }
}

/// Approximate a circle around `center` with `vertex_count + 1` vertices.
///
/// `vertex_count` is raised to 3 if smaller.
pub fn buffer_circle(center: Coordinate, radius_meters: f64, vertex_count: usize) -> ClosedPolygon {
    let vertex_count = vertex_count.max(3);
    let (lon, lat) = center.xy();

    let meters_per_degree_longitude =
        (METERS_PER_DEGREE_LATITUDE * lat.to_radians().cos()).max(f64::EPSILON);
    let delta_lat = radius_meters / METERS_PER_DEGREE_LATITUDE;
    let delta_lon = radius_meters / meters_per_degree_longitude;

    let mut ring = Vec::with_capacity(vertex_count + 1);
    for i in 0..vertex_count {
        let angle = -TAU * i as f64 / vertex_count as f64;
        ring.push((lon + delta_lon * angle.cos(), lat + delta_lat * angle.sin()));
    }
    ring.push(ring[0]);

    ClosedPolygon { ring }
}

/// Exclusion radius for an incident: 100 m at severity 1 up to 300 m at 5.
///
/// Severities outside 1..=5 are clamped.
pub fn severity_to_radius_meters(severity: u8) -> f64 {
    let severity = severity.clamp(1, 5);
    100.0 + f64::from(severity - 1) * 50.0
}

/// Great-circle distance in meters.
pub fn haversine_meters(from: Coordinate, to: Coordinate) -> f64 {
    let lat1_rad = from.latitude().to_radians();
    let lat2_rad = to.latitude().to_radians();
    let delta_lat = (to.latitude() - from.latitude()).to_radians();
    let delta_lng = (to.longitude() - from.longitude()).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_M * c
}

pub fn is_web_mercator(wkid: u32) -> bool {
    WEB_MERCATOR_WKIDS.contains(&wkid)
}

/// Inverse spherical Mercator: meters (x, y) to degrees (longitude, latitude).
pub fn web_mercator_to_wgs84(x: f64, y: f64) -> (f64, f64) {
    let lon = (x / WEB_MERCATOR_RADIUS_M).to_degrees();
    let lat = (2.0 * (y / WEB_MERCATOR_RADIUS_M).exp().atan() - FRAC_PI_2).to_degrees();
    (lon, lat)
}
