//! Bookmarked movies, persisted as one JSON array under [`SAVED_MOVIES_KEY`].
//!
//! Every operation is a read-modify-write of the whole collection. The
//! cycle runs under a single async mutex, so two toggles issued back to
//! back from different tasks are applied one after the other instead of
//! both starting from the same snapshot.

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::error::StoreError;
use crate::models::MovieSummary;
use crate::storage::KeyValueStore;

pub const SAVED_MOVIES_KEY: &str = "savedMovies";

pub struct SavedMovies {
    store: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
}

impl SavedMovies {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Saved movies in the order they were saved. Never fails: an absent
    /// or unreadable entry reads as an empty list.
    pub async fn list(&self) -> Vec<MovieSummary> {
        let _guard = self.write_lock.lock().await;
        self.read().await
    }

    pub async fn contains(&self, id: i64) -> bool {
        self.list().await.iter().any(|m| m.id == id)
    }

    /// Appends `movie` unless a movie with the same id is already saved.
    /// Returns whether the collection changed.
    pub async fn add(&self, movie: MovieSummary) -> bool {
        let _guard = self.write_lock.lock().await;
        let mut movies = self.read().await;
        if movies.iter().any(|m| m.id == movie.id) {
            return false;
        }
        info!("Saving movie {} ('{}')", movie.id, movie.title);
        movies.push(movie);
        self.write(&movies).await;
        true
    }

    /// Returns whether a movie was removed.
    pub async fn remove(&self, id: i64) -> bool {
        let _guard = self.write_lock.lock().await;
        let mut movies = self.read().await;
        let before = movies.len();
        movies.retain(|m| m.id != id);
        if movies.len() == before {
            return false;
        }
        info!("Removing saved movie {}", id);
        self.write(&movies).await;
        true
    }

    /// Flips membership of `movie` and returns the new state: `true` if it
    /// is now saved.
    pub async fn toggle(&self, movie: MovieSummary) -> bool {
        let _guard = self.write_lock.lock().await;
        let mut movies = self.read().await;
        let saved = match movies.iter().position(|m| m.id == movie.id) {
            Some(idx) => {
                info!("Removing saved movie {}", movie.id);
                movies.remove(idx);
                false
            }
            None => {
                info!("Saving movie {} ('{}')", movie.id, movie.title);
                movies.push(movie);
                true
            }
        };
        self.write(&movies).await;
        saved
    }

    async fn read(&self) -> Vec<MovieSummary> {
        match self.try_read().await {
            Ok(movies) => movies,
            Err(e) => {
                warn!("Error fetching saved movies, treating as empty: {}", e);
                Vec::new()
            }
        }
    }

    async fn try_read(&self) -> Result<Vec<MovieSummary>, StoreError> {
        let Some(raw) = self.store.get(SAVED_MOVIES_KEY).await? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&raw).map_err(StoreError::Deserialization)
    }

    // Failures are logged only; callers keep the state they asked for.
    async fn write(&self, movies: &[MovieSummary]) {
        let body = match serde_json::to_string(movies) {
            Ok(body) => body,
            Err(e) => {
                error!("Failed to serialize saved movies: {}", e);
                return;
            }
        };
        match self.store.set(SAVED_MOVIES_KEY, &body).await {
            Ok(()) => debug!(count = movies.len(), "Persisted saved movies"),
            Err(e) => error!("Failed to persist saved movies: {}", e),
        }
    }
}
