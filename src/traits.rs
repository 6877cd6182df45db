//! Seam between the planner and the external routing service.
//!
//! The planner never talks HTTP directly. [`crate::arcgis::ArcGisClient`]
//! is the production implementation; tests supply deterministic stubs.

use crate::error::RoutingError;
use crate::request::ProviderRouteRequest;
use crate::response::ProviderRouteResponse;
use crate::travel_mode::TravelMode;

/// An external routing service.
///
/// Implementations do not retry; each failure is returned as-is and the
/// retry policy belongs to the caller.
pub trait RouteProvider {
    /// Whether a routing credential is configured.
    fn has_credential(&self) -> bool;

    /// Fetch the provider's supported travel modes, in provider order.
    fn fetch_travel_modes(&self) -> Result<Vec<TravelMode>, RoutingError>;

    /// Submit a route request and return the raw provider response.
    fn submit(&self, request: &ProviderRouteRequest) -> Result<ProviderRouteResponse, RoutingError>;
}

impl<P> RouteProvider for &P
where
    P: RouteProvider + ?Sized,
{
    fn has_credential(&self) -> bool {
        (**self).has_credential()
    }

    fn fetch_travel_modes(&self) -> Result<Vec<TravelMode>, RoutingError> {
        (**self).fetch_travel_modes()
    }

    fn submit(
        &self,
        request: &ProviderRouteRequest,
    ) -> Result<ProviderRouteResponse, RoutingError> {
        (**self).submit(request)
    }
}
