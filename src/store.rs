//! Owned location store
//!
//! Keeps the authoritative location list, the one that gets persisted,
//! next to the index built from it. Only locations passing the
//! availability filter are indexed; the list keeps every record.

use tracing::{debug, warn};

use crate::diagnostic::{self, TreeDescription};
use crate::index::{DistanceMetric, LocationIndex, Nearest};
use crate::models::{Coordinates, Location, Scooter};
use crate::selector::ScooterSelector;
use crate::{Result, ScooterHubError};

/// Store behaviour chosen at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    pub distance_metric: DistanceMetric,
    /// Index only locations with at least one scooter not in repair
    pub require_available_scooter: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            distance_metric: DistanceMetric::default(),
            require_available_scooter: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LocationStore {
    locations: Vec<Location>,
    index: LocationIndex,
    options: StoreOptions,
}

impl LocationStore {
    #[must_use]
    pub fn new(options: StoreOptions) -> Self {
        Self {
            locations: Vec::new(),
            index: LocationIndex::new(),
            options,
        }
    }

    /// Build a store from dataset records. Invalid records and records
    /// repeating an earlier identifier are dropped with a warning.
    #[must_use]
    pub fn from_locations(locations: Vec<Location>, options: StoreOptions) -> Self {
        let mut store = Self::new(options);
        for location in locations {
            if let Err(err) = location.validate() {
                warn!(id = %location.id, "Skipping invalid dataset record: {}", err);
                continue;
            }
            if store.contains(&location.id) {
                warn!(id = %location.id, "Skipping dataset record with duplicate id");
                continue;
            }
            let position = store.locations.len();
            if let Err(err) = store.place(position, location) {
                warn!("Skipping dataset record: {}", err);
            }
        }
        debug!(
            total = store.locations.len(),
            indexed = store.index.len(),
            height = store.index.height(),
            "Location store built"
        );
        store
    }

    /// Every known location in dataset order
    #[must_use]
    pub fn list(&self) -> &[Location] {
        &self.locations
    }

    #[must_use]
    pub fn index(&self) -> &LocationIndex {
        &self.index
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.locations.iter().position(|location| location.id == id)
    }

    fn qualifies(&self, location: &Location) -> bool {
        !self.options.require_available_scooter || location.has_available_scooter()
    }

    pub fn search(&self, id: &str) -> Result<&Location> {
        self.index
            .search(id)
            .ok_or_else(|| ScooterHubError::not_found(format!("Location {id} doesn't exist")))
    }

    pub fn nearest(&self, point: Coordinates) -> Result<Nearest<'_>> {
        point.validate()?;
        self.index
            .find_nearest(point, self.options.distance_metric)
            .ok_or_else(|| ScooterHubError::not_found("Available location not found"))
    }

    /// Resolve the location, then pick its best scooter
    pub fn best_scooter(&self, id: &str) -> Result<&Scooter> {
        let location = self.search(id)?;
        ScooterSelector::select_best(&location.scooters).ok_or_else(|| {
            ScooterHubError::not_found(format!("Couldn't find good scooter at location {id}"))
        })
    }

    /// Add a new location. Identifiers already in the list are rejected
    /// even when the existing record is not indexed.
    pub fn insert(&mut self, location: Location) -> Result<()> {
        location.validate()?;
        if self.contains(&location.id) {
            return Err(ScooterHubError::duplicate_key(location.id));
        }
        let position = self.locations.len();
        self.place(position, location)
    }

    pub fn remove(&mut self, id: &str) -> Result<Location> {
        self.remove_entry(id).map(|(_, location)| location)
    }

    /// Remove a location and report where it sat in the list
    pub(crate) fn remove_entry(&mut self, id: &str) -> Result<(usize, Location)> {
        let position = self
            .position(id)
            .ok_or_else(|| ScooterHubError::not_found(format!("Location {id} doesn't exist")))?;
        if self.index.contains(id) {
            self.index.delete(id)?;
        } else {
            debug!(id, "Removed location was not indexed");
        }
        Ok((position, self.locations.remove(position)))
    }

    /// Put back a location taken out by `remove_entry`
    pub(crate) fn restore(&mut self, position: usize, location: Location) -> Result<()> {
        self.place(position.min(self.locations.len()), location)
    }

    fn place(&mut self, position: usize, location: Location) -> Result<()> {
        if self.qualifies(&location) {
            self.index.insert(location.clone())?;
        } else {
            debug!(id = %location.id, "Location has no available scooter, not indexed");
        }
        self.locations.insert(position, location);
        Ok(())
    }

    #[must_use]
    pub fn tree(&self) -> TreeDescription {
        diagnostic::render(&self.index)
    }
}
