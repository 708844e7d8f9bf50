//! Data models for the ScooterHub service
//!
//! - Location: a named place with coordinates and its scooters
//! - Scooter: a rentable vehicle with battery level and repair flag

pub mod location;
pub mod scooter;

pub use location::{Coordinates, Location, LocationDraft};
pub use scooter::Scooter;
