//! safe-route-planner core
//!
//! Plans routes through an external routing service while steering them
//! away from reported incidents.

pub mod error;
pub mod model;
pub mod geometry;
pub mod polyline;
pub mod traits;
pub mod travel_mode;
pub mod barriers;
pub mod request;
pub mod response;
pub mod normalize;
pub mod arcgis;
pub mod planner;
pub mod safety;
pub mod options;
