//! Error taxonomy for route planning.
//!
//! Degraded-but-successful outcomes are not errors; they are reported as
//! [`crate::model::Fallback`] entries on the returned route.

use thiserror::Error;

/// Errors surfaced by the planner, the provider client and input validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// No routing credential is configured.
    #[error("routing credential is not configured")]
    Configuration,

    /// Transport failure reaching the routing provider.
    #[error("routing provider unavailable at {url}: {message}")]
    ProviderUnavailable { url: String, message: String },

    /// The provider answered but refused the request.
    #[error("routing provider rejected the request ({code}): {message}")]
    ProviderRejected { code: i64, message: String },

    /// The provider answered successfully with no usable route.
    #[error("no route found between the requested stops")]
    NoRouteFound,

    /// A provider payload could not be encoded or decoded.
    #[error("malformed provider payload: {message}")]
    Payload { message: String },

    #[error("{0}")]
    InvalidCoordinate(String),

    #[error("severity must be between 1 and 5, got {0}")]
    InvalidSeverity(i64),

    #[error("invalid mode '{0}', must be one of bicycle, car, pedestrian")]
    InvalidProfile(String),
}

impl RoutingError {
    pub(crate) fn payload(message: impl Into<String>) -> Self {
        Self::Payload {
            message: message.into(),
        }
    }

    /// Whether the caller may reasonably retry the same request later.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::ProviderUnavailable { .. })
    }
}
