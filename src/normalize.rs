//! Normalization of provider responses into [`RouteResult`].
//!
//! Different provider configurations populate different attribute subsets,
//! so distance and duration are read through ordered fallbacks. Anything
//! that cannot be resolved degrades to placeholder text and is recorded as
//! a [`Fallback`] instead of failing the call.

use tracing::warn;

use crate::error::RoutingError;
use crate::geometry::{is_web_mercator, web_mercator_to_wgs84};
use crate::model::{Fallback, RouteResult};
use crate::polyline::{Polyline, SpatialReference};
use crate::response::{ProviderRouteResponse, RouteFeature};

pub const KILOMETERS_PER_MILE: f64 = 1.60934;

pub const DISTANCE_UNAVAILABLE: &str = "distance unavailable";
pub const DURATION_UNAVAILABLE: &str = "time unavailable";

/// Extract the first route of `response`.
///
/// Fails with [`RoutingError::NoRouteFound`] when there is no route or the
/// route carries no geometry.
pub fn normalize(response: ProviderRouteResponse) -> Result<RouteResult, RoutingError> {
    let routes = response.routes.ok_or(RoutingError::NoRouteFound)?;
    let feature = routes
        .features
        .into_iter()
        .next()
        .ok_or(RoutingError::NoRouteFound)?;

    let mut fallbacks = Vec::new();

    let distance_km = extract_distance_km(&feature);
    if distance_km.is_none() {
        warn!("route carries no distance attribute");
        fallbacks.push(Fallback::DistanceUnavailable);
    }
    let duration_minutes = extract_duration_minutes(&feature);
    if duration_minutes.is_none() {
        warn!("route carries no time attribute");
        fallbacks.push(Fallback::DurationUnavailable);
    }

    let path = match feature.geometry {
        Some(geometry) => geometry.into_polyline()?,
        None => return Err(RoutingError::NoRouteFound),
    }
    .or_spatial_reference(routes.spatial_reference);
    if path.is_empty() {
        return Err(RoutingError::NoRouteFound);
    }

    let canonical = match to_canonical(&path) {
        Some(canonical) => canonical,
        None => {
            warn!(
                wkid = ?path.spatial_reference().and_then(|sr| sr.code()),
                "cannot reproject route geometry, using it untransformed"
            );
            fallbacks.push(Fallback::UntransformedGeometry);
            path.clone()
        }
    };

    Ok(RouteResult {
        distance_label: format_distance(distance_km),
        duration_label: format_duration(duration_minutes),
        path,
        canonical,
        distance_km,
        duration_minutes,
        fallbacks,
    })
}

/// Kilometers, else miles converted, else nothing.
pub fn extract_distance_km(feature: &RouteFeature) -> Option<f64> {
    feature
        .numeric_attribute("Total_Kilometers")
        .or_else(|| {
            feature
                .numeric_attribute("Total_Miles")
                .map(|miles| miles * KILOMETERS_PER_MILE)
        })
}

/// Travel time, else generic time, in minutes.
pub fn extract_duration_minutes(feature: &RouteFeature) -> Option<f64> {
    feature
        .numeric_attribute("Total_TravelTime")
        .or_else(|| feature.numeric_attribute("Total_Time"))
}

pub fn format_distance(distance_km: Option<f64>) -> String {
    match distance_km {
        Some(km) => format!("{km:.2} km"),
        None => DISTANCE_UNAVAILABLE.to_string(),
    }
}

pub fn format_duration(duration_minutes: Option<f64>) -> String {
    match duration_minutes {
        Some(minutes) => format!("{} min", minutes.round() as i64),
        None => DURATION_UNAVAILABLE.to_string(),
    }
}

/// The path in WGS84, or `None` when it cannot be reprojected.
///
/// A path without any spatial reference is taken as WGS84, which is the
/// output reference every request asks for.
fn to_canonical(path: &Polyline) -> Option<Polyline> {
    let reference = match path.spatial_reference() {
        None => return Some(path.clone()),
        Some(reference) if reference.is_wgs84() => return Some(path.clone()),
        Some(reference) => reference,
    };

    let wkid = reference.code()?;
    if !is_web_mercator(wkid) {
        return None;
    }
    let reprojected = path.map_points(SpatialReference::wgs84(), web_mercator_to_wgs84);
    (!reprojected.is_empty()).then_some(reprojected)
}
