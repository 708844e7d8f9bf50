//! `ScooterHub` - scooter location directory
//!
//! Locations are kept in an AVL tree keyed by identifier. On top of it the
//! crate answers exact lookups, nearest-location queries and "best scooter
//! at this location" queries, and serves them over HTTP.

pub mod api;
pub mod config;
pub mod dataset;
pub mod diagnostic;
pub mod directory;
pub mod error;
pub mod index;
pub mod logging;
pub mod models;
pub mod selector;
pub mod store;
pub mod web;

// Re-export core types for public API
pub use config::ScooterHubConfig;
pub use diagnostic::TreeDescription;
pub use directory::LocationDirectory;
pub use error::ScooterHubError;
pub use index::{DistanceMetric, LocationIndex};
pub use models::{Coordinates, Location, LocationDraft, Scooter};
pub use selector::ScooterSelector;
pub use store::{LocationStore, StoreOptions};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, ScooterHubError>;
