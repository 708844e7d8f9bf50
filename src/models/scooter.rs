//! Scooter model

use serde::{Deserialize, Serialize};

use crate::{Result, ScooterHubError};

/// Highest battery level a scooter can report
pub const MAX_BATTERY: u8 = 100;

/// A rentable scooter
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Scooter {
    pub id: String,
    /// Battery level in percent, the fitness used for selection
    pub battery: u8,
    /// Set while the scooter is being repaired; such scooters are never handed out
    pub repair: bool,
}

impl Scooter {
    #[must_use]
    pub fn new(id: impl Into<String>, battery: u8, repair: bool) -> Self {
        Self {
            id: id.into(),
            battery,
            repair,
        }
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        !self.repair
    }

    pub fn validate(&self) -> Result<()> {
        if self.battery > MAX_BATTERY {
            return Err(ScooterHubError::validation(format!(
                "scooter {} battery {} exceeds {MAX_BATTERY}",
                self.id, self.battery
            )));
        }
        Ok(())
    }
}
