//! Shared location directory
//!
//! Wraps the store in a read/write lock: lookups run concurrently, inserts
//! and removals take the lock exclusively until the new dataset has been
//! written. A failed write undoes the in-memory change before the error is
//! returned.

use std::sync::Arc;

use rand::RngExt;
use tokio::sync::RwLock;
use tokio::task;
use tracing::{error, info, instrument};

use crate::dataset::LocationRepository;
use crate::diagnostic::TreeDescription;
use crate::models::{Coordinates, Location, LocationDraft, Scooter};
use crate::store::{LocationStore, StoreOptions};
use crate::{Result, ScooterHubError};

const ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const ID_LENGTH: usize = 8;
const MAX_ID_ATTEMPTS: usize = 16;

pub struct LocationDirectory {
    store: RwLock<LocationStore>,
    repository: Arc<dyn LocationRepository>,
}

impl LocationDirectory {
    /// Load the dataset from `repository` and index it
    pub fn open(repository: Arc<dyn LocationRepository>, options: StoreOptions) -> Result<Self> {
        let locations = repository.load()?;
        let store = LocationStore::from_locations(locations, options);
        info!(
            total = store.list().len(),
            indexed = store.index().len(),
            "Location directory ready"
        );
        Ok(Self {
            store: RwLock::new(store),
            repository,
        })
    }

    pub async fn list(&self) -> Vec<Location> {
        self.store.read().await.list().to_vec()
    }

    pub async fn search(&self, id: &str) -> Result<Location> {
        Ok(self.store.read().await.search(id)?.clone())
    }

    /// Closest indexed location and its distance from `point`
    pub async fn nearest(&self, point: Coordinates) -> Result<(Location, f64)> {
        let store = self.store.read().await;
        let nearest = store.nearest(point)?;
        Ok((nearest.location.clone(), nearest.distance))
    }

    pub async fn best_scooter(&self, location_id: &str) -> Result<Scooter> {
        Ok(self.store.read().await.best_scooter(location_id)?.clone())
    }

    pub async fn tree(&self) -> TreeDescription {
        self.store.read().await.tree()
    }

    /// Create a location under a freshly generated identifier
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn add(&self, draft: LocationDraft) -> Result<Location> {
        let mut store = self.store.write().await;
        let location = draft.into_location(unused_id(&store, generate_id)?);
        store.insert(location.clone())?;

        if let Err(err) = self.persist(store.list().to_vec()).await {
            store.remove(&location.id)?;
            return Err(err);
        }
        info!(id = %location.id, "Location added");
        Ok(location)
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, id: &str) -> Result<Location> {
        let mut store = self.store.write().await;
        let (position, location) = store.remove_entry(id)?;

        if let Err(err) = self.persist(store.list().to_vec()).await {
            store.restore(position, location)?;
            return Err(err);
        }
        info!(id, "Location removed");
        Ok(location)
    }

    /// Write the current state to the repository, used on shutdown
    pub async fn flush(&self) -> Result<()> {
        let snapshot = self.store.read().await.list().to_vec();
        self.persist(snapshot).await
    }

    async fn persist(&self, snapshot: Vec<Location>) -> Result<()> {
        let repository = Arc::clone(&self.repository);
        task::spawn_blocking(move || repository.save(&snapshot))
            .await
            .map_err(|e| ScooterHubError::persistence(e.to_string()))?
            .map_err(|e| {
                error!("Failed to persist dataset: {}", e);
                match e {
                    ScooterHubError::Persistence { .. } => e,
                    other => ScooterHubError::persistence(other.to_string()),
                }
            })
    }
}

fn unused_id(store: &LocationStore, mut generate: impl FnMut() -> String) -> Result<String> {
    for _ in 0..MAX_ID_ATTEMPTS {
        let id = generate();
        if !store.contains(&id) {
            return Ok(id);
        }
    }
    Err(ScooterHubError::IdExhausted {
        attempts: MAX_ID_ATTEMPTS,
    })
}

fn generate_id() -> String {
    let mut rng = rand::rng();
    (0..ID_LENGTH)
        .map(|_| char::from(ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::MemoryRepository;

    fn seeded() -> (Arc<MemoryRepository>, LocationDirectory) {
        let repository = Arc::new(MemoryRepository::new(vec![
            Location::new("a", "Alpha", 0.0, 0.0).with_scooters(vec![Scooter::new("a1", 60, false)]),
            Location::new("b", "Bravo", 10.0, 10.0).with_scooters(vec![Scooter::new("b1", 90, false)]),
        ]));
        let directory = LocationDirectory::open(repository.clone(), StoreOptions::default()).unwrap();
        (repository, directory)
    }

    fn draft(name: &str) -> LocationDraft {
        LocationDraft {
            name: name.to_string(),
            latitude: 5.0,
            longitude: 5.0,
            scooters: vec![Scooter::new("c1", 75, false)],
        }
    }

    #[test]
    fn test_generated_ids() {
        let id = generate_id();
        assert_eq!(id.len(), ID_LENGTH);
        assert!(id.bytes().all(|b| ID_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_unused_id_gives_up_after_repeated_collisions() {
        let store = LocationStore::from_locations(
            vec![Location::new("taken", "Taken", 0.0, 0.0).with_scooters(vec![Scooter::new("t1", 10, false)])],
            StoreOptions::default(),
        );
        let mut calls = 0;

        let result = unused_id(&store, || {
            calls += 1;
            "taken".to_string()
        });

        assert!(matches!(result, Err(ScooterHubError::IdExhausted { attempts }) if attempts == MAX_ID_ATTEMPTS));
        assert_eq!(calls, MAX_ID_ATTEMPTS);
        assert_eq!(unused_id(&store, || "free".to_string()).unwrap(), "free");
    }

    #[tokio::test]
    async fn test_add_persists_and_indexes() {
        let (repository, directory) = seeded();

        let created = directory.add(draft("Charlie")).await.unwrap();

        assert_eq!(directory.search(&created.id).await.unwrap().name, "Charlie");
        assert_eq!(repository.snapshot().unwrap().len(), 3);
        assert_eq!(repository.save_count(), 1);
        let (nearest, _) = directory.nearest(Coordinates::new(4.0, 4.0)).await.unwrap();
        assert_eq!(nearest.id, created.id);
    }

    #[tokio::test]
    async fn test_failed_persist_rolls_back_add() {
        let (repository, directory) = seeded();
        repository.set_fail_saves(true);

        let result = directory.add(draft("Charlie")).await;

        assert!(matches!(result, Err(ScooterHubError::Persistence { .. })));
        assert_eq!(directory.list().await.len(), 2);
        assert_eq!(directory.tree().await.size, 2);
    }

    #[tokio::test]
    async fn test_remove_persists() {
        let (repository, directory) = seeded();

        let removed = directory.remove("a").await.unwrap();

        assert_eq!(removed.id, "a");
        assert!(directory.search("a").await.is_err());
        let ids: Vec<String> = repository.snapshot().unwrap().into_iter().map(|l| l.id).collect();
        assert_eq!(ids, vec!["b"]);
    }

    #[tokio::test]
    async fn test_failed_persist_rolls_back_remove() {
        let (repository, directory) = seeded();
        repository.set_fail_saves(true);

        assert!(directory.remove("a").await.is_err());

        assert_eq!(directory.search("a").await.unwrap().name, "Alpha");
        let ids: Vec<String> = directory.list().await.into_iter().map(|l| l.id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_remove_unknown_does_not_persist() {
        let (repository, directory) = seeded();

        assert!(matches!(directory.remove("zzz").await, Err(ScooterHubError::NotFound { .. })));
        assert_eq!(repository.save_count(), 0);
    }

    #[tokio::test]
    async fn test_best_scooter_and_flush() {
        let (repository, directory) = seeded();

        assert_eq!(directory.best_scooter("b").await.unwrap().id, "b1");
        directory.flush().await.unwrap();
        assert_eq!(repository.save_count(), 1);
    }
}
