//! Route planning: incidents and a trip request in, a normalized route out.

use tracing::{info, warn};

use crate::barriers::build_barriers;
use crate::error::RoutingError;
use crate::model::{Fallback, Incident, RoutePlanRequest, RouteResult};
use crate::normalize::normalize;
use crate::request::assemble_request;
use crate::traits::RouteProvider;
use crate::travel_mode::{TravelMode, TravelModeResolver};

/// Plans incident-avoiding routes through a [`RouteProvider`].
///
/// The only state shared between calls is the travel-mode catalog cache,
/// so a planner may serve concurrent calls when its provider is `Sync`.
#[derive(Debug)]
pub struct RoutePlanner<P> {
    provider: P,
    travel_modes: TravelModeResolver,
}

impl<P: RouteProvider> RoutePlanner<P> {
    pub fn new(provider: P) -> Self {
        Self::with_resolver(provider, TravelModeResolver::new())
    }

    pub fn with_resolver(provider: P, travel_modes: TravelModeResolver) -> Self {
        Self {
            provider,
            travel_modes,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn travel_modes(&self) -> &TravelModeResolver {
        &self.travel_modes
    }

    /// Plan a route from `plan.start` to `plan.end` around the incidents
    /// whose type is in `plan.avoid_types`.
    ///
    /// Either returns a complete result, possibly with recorded fallbacks,
    /// or fails. Provider failures are returned unchanged and never retried.
    pub fn plan_route(
        &self,
        plan: &RoutePlanRequest,
        incidents: &[Incident],
    ) -> Result<RouteResult, RoutingError> {
        if !self.provider.has_credential() {
            return Err(RoutingError::Configuration);
        }

        let travel_mode = self.resolve_travel_mode(plan);
        let provider_default = travel_mode.is_none();

        let barriers = build_barriers(incidents, &plan.avoid_types);
        let request = assemble_request(plan, barriers, travel_mode);

        info!(
            mode = %plan.mode,
            avoid = plan.avoid_types.len(),
            polygon_barriers = request.polygon_barriers.len(),
            point_barriers = request.point_barriers.len(),
            "planning route"
        );
        let response = self.provider.submit(&request)?;

        let mut result = normalize(response)?;
        if provider_default {
            result.fallbacks.push(Fallback::ProviderDefaultTravelMode);
        }
        info!(
            distance = %result.distance_label,
            duration = %result.duration_label,
            degraded = result.is_degraded(),
            "route planned"
        );
        Ok(result)
    }

    /// A catalog failure degrades to the provider's default mode.
    fn resolve_travel_mode(&self, plan: &RoutePlanRequest) -> Option<TravelMode> {
        match self.travel_modes.resolve(&self.provider, plan.mode) {
            Ok(Some(mode)) => Some(mode),
            Ok(None) => {
                warn!(profile = %plan.mode, "travel mode catalog is empty, using provider default");
                None
            }
            Err(err) => {
                warn!(
                    profile = %plan.mode,
                    error = %err,
                    "travel mode lookup failed, using provider default"
                );
                None
            }
        }
    }
}
