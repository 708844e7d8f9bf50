//! Dataset persistence
//!
//! The dataset is a JSON array of locations. It is read once at startup
//! and written back in full after every change.

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tracing::{debug, info};

use crate::models::Location;
use crate::{Result, ScooterHubError};

/// Source and sink for the authoritative location list
pub trait LocationRepository: Send + Sync {
    fn load(&self) -> Result<Vec<Location>>;
    fn save(&self, locations: &[Location]) -> Result<()>;
}

/// Dataset stored as a JSON file on disk
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LocationRepository for JsonFileRepository {
    fn load(&self) -> Result<Vec<Location>> {
        let contents = fs::read_to_string(&self.path).map_err(|e| {
            ScooterHubError::dataset(format!("cannot read {}: {e}", self.path.display()))
        })?;
        let locations: Vec<Location> = serde_json::from_str(&contents).map_err(|e| {
            ScooterHubError::dataset(format!("cannot parse {}: {e}", self.path.display()))
        })?;
        info!("Loaded {} locations from {}", locations.len(), self.path.display());
        Ok(locations)
    }

    /// Write to a sibling temp file, then rename over the dataset
    fn save(&self, locations: &[Location]) -> Result<()> {
        let json = serde_json::to_string_pretty(locations)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        debug!("Saved {} locations to {}", locations.len(), self.path.display());
        Ok(())
    }
}

/// Repository that keeps the dataset in memory
#[derive(Debug, Default)]
pub struct MemoryRepository {
    locations: Mutex<Vec<Location>>,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryRepository {
    #[must_use]
    pub fn new(locations: Vec<Location>) -> Self {
        Self {
            locations: Mutex::new(locations),
            ..Self::default()
        }
    }

    /// Make subsequent saves fail (or succeed again)
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves so far
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> Result<Vec<Location>> {
        self.load()
    }
}

impl LocationRepository for MemoryRepository {
    fn load(&self) -> Result<Vec<Location>> {
        let locations = self
            .locations
            .lock()
            .map_err(|_| ScooterHubError::dataset("memory repository lock poisoned"))?;
        Ok(locations.clone())
    }

    fn save(&self, locations: &[Location]) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(ScooterHubError::persistence("saving is disabled"));
        }
        let mut stored = self
            .locations
            .lock()
            .map_err(|_| ScooterHubError::persistence("memory repository lock poisoned"))?;
        *stored = locations.to_vec();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Scooter;

    fn sample() -> Vec<Location> {
        vec![
            Location::new("a1", "Harbour", 55.67, 12.59)
                .with_scooters(vec![Scooter::new("s1", 80, false), Scooter::new("s2", 20, true)]),
            Location::new("b2", "Station", 55.68, 12.57),
        ]
    }

    #[test]
    fn test_json_file_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let repository = JsonFileRepository::new(dir.path().join("dataset.json"));

        repository.save(&sample()).unwrap();
        let loaded = repository.load().unwrap();

        assert_eq!(loaded, sample());
        assert!(!dir.path().join("dataset.json.tmp").exists());
    }

    #[test]
    fn test_json_file_reads_source_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataset.json");
        fs::write(
            &path,
            r#"[{"id": "x", "name": "X", "latitude": 1.5, "longitude": 2.5,
                 "scooters": [{"id": "s", "battery": 64, "repair": true}]}]"#,
        )
        .unwrap();

        let loaded = JsonFileRepository::new(&path).load().unwrap();

        assert_eq!(loaded.len(), 1);
        assert!(loaded[0].scooters[0].repair);
    }

    #[test]
    fn test_json_file_missing_or_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let missing = JsonFileRepository::new(dir.path().join("missing.json"));
        assert!(matches!(missing.load(), Err(ScooterHubError::Dataset { .. })));

        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            JsonFileRepository::new(&path).load(),
            Err(ScooterHubError::Dataset { .. })
        ));
    }

    #[test]
    fn test_memory_repository_failure_toggle() {
        let repository = MemoryRepository::new(sample());

        repository.set_fail_saves(true);
        assert!(repository.save(&[]).is_err());
        assert_eq!(repository.snapshot().unwrap().len(), 2);

        repository.set_fail_saves(false);
        repository.save(&[]).unwrap();
        assert!(repository.snapshot().unwrap().is_empty());
        assert_eq!(repository.save_count(), 1);
    }
}
