//! Location model: a named place holding a set of rentable scooters

use serde::{Deserialize, Serialize};

use super::Scooter;
use crate::{Result, ScooterHubError};

/// Geographic point in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check that both components are finite and within geographic range
    pub fn validate(&self) -> Result<()> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(ScooterHubError::validation(format!(
                "latitude {} must be between -90 and 90",
                self.latitude
            )));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(ScooterHubError::validation(format!(
                "longitude {} must be between -180 and 180",
                self.longitude
            )));
        }
        Ok(())
    }
}

/// A rental location as stored in the dataset
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Unique identifier, the index key
    pub id: String,
    /// Display name
    pub name: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Scooters parked at this location, in insertion order
    #[serde(default)]
    pub scooters: Vec<Scooter>,
}

impl Location {
    /// Create a location without scooters
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            latitude,
            longitude,
            scooters: Vec::new(),
        }
    }

    /// Replace the scooter list
    #[must_use]
    pub fn with_scooters(mut self, scooters: Vec<Scooter>) -> Self {
        self.scooters = scooters;
        self
    }

    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// True when at least one scooter is not in repair
    #[must_use]
    pub fn has_available_scooter(&self) -> bool {
        self.scooters.iter().any(Scooter::is_available)
    }

    /// Validate identifier, name, coordinates and every scooter
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(ScooterHubError::validation("location id cannot be empty"));
        }
        if self.name.trim().is_empty() {
            return Err(ScooterHubError::validation("location name cannot be empty"));
        }
        self.coordinates().validate()?;
        for scooter in &self.scooters {
            scooter.validate()?;
        }
        Ok(())
    }
}

/// A location submitted for creation; the service assigns the identifier
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LocationDraft {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub scooters: Vec<Scooter>,
}

impl LocationDraft {
    #[must_use]
    pub fn into_location(self, id: String) -> Location {
        Location {
            id,
            name: self.name,
            latitude: self.latitude,
            longitude: self.longitude,
            scooters: self.scooters,
        }
    }
}
