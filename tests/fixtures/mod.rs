//! Test fixtures for safe-route-planner.
//!
//! Provides realistic test data including:
//! - Real Bucharest locations (from OpenStreetMap)
//! - A deterministic stub routing provider

pub mod bucharest_locations;
pub mod stub_provider;

pub use bucharest_locations::*;
pub use stub_provider::*;
