//! Favorites store.
//!
//! Holds the favorites collection in memory and mirrors it into a
//! [`KeyValueStore`] under a single key. The whole collection is the unit of
//! persistence: every successful mutation rewrites it in full.
//!
//! Mutations are serialized through one FIFO queue (`tokio::sync::Mutex`),
//! and the in-memory collection is only replaced after the write succeeded,
//! so it always equals the last successfully persisted state.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use cinefav_db::KeyValueStore;
use tokio::sync::{Mutex, watch};
use tracing::instrument;

use crate::error::FavoritesError;
use crate::model::FavoriteMovie;

/// Storage key holding the serialized collection.
pub const FAVORITES_KEY: &str = "@movie_favorites";

/// Decodes a persisted collection.
///
/// A JSON `null` is treated as empty. Duplicate ids keep their first entry.
fn decode(raw: &str) -> Result<Vec<FavoriteMovie>, serde_json::Error> {
    let parsed: Option<Vec<FavoriteMovie>> = serde_json::from_str(raw)?;
    let mut seen = HashSet::new();
    let mut favorites = parsed.unwrap_or_default();
    let before = favorites.len();
    favorites.retain(|f| seen.insert(f.id.clone()));
    if favorites.len() != before {
        tracing::warn!(
            dropped = before.saturating_sub(favorites.len()),
            "persisted favorites contained duplicate ids"
        );
    }
    Ok(favorites)
}

/// In-memory favorites collection backed by a key-value store.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct FavoritesStore<S> {
    /// External persistent store.
    kv: Arc<S>,
    /// Current collection; also the change-notification channel.
    state: watch::Sender<Vec<FavoriteMovie>>,
    /// Mutation queue. Held for the whole read-modify-persist cycle.
    mutation: Mutex<()>,
    /// Set by `load`, cleared by `close`.
    ready: AtomicBool,
}

impl<S: KeyValueStore + Sync> FavoritesStore<S> {
    /// Creates an unloaded, empty store.
    #[must_use]
    pub fn new(kv: Arc<S>) -> Self {
        Self {
            kv,
            state: watch::Sender::new(Vec::new()),
            mutation: Mutex::new(()),
            ready: AtomicBool::new(false),
        }
    }

    /// Creates and loads a store, treating corrupt persisted data as empty.
    ///
    /// # Errors
    ///
    /// Returns `FavoritesError::Persistence` if the storage cannot be read.
    pub async fn open(kv: Arc<S>) -> Result<Self, FavoritesError> {
        let store = Self::new(kv);
        match store.load().await {
            Ok(_) | Err(FavoritesError::Deserialization(_)) => Ok(store),
            Err(err) => Err(err),
        }
    }

    /// Reads the persisted collection into memory and marks the store ready.
    ///
    /// Returns the number of loaded favorites. A missing key loads an empty
    /// collection.
    ///
    /// # Errors
    ///
    /// - `FavoritesError::Persistence` if the storage cannot be read; the
    ///   store stays not ready.
    /// - `FavoritesError::Deserialization` if the persisted data is corrupt;
    ///   the store is left empty and ready.
    #[instrument(skip_all)]
    pub async fn load(&self) -> Result<usize, FavoritesError> {
        let _queue = self.mutation.lock().await;

        let raw = self
            .kv
            .get(FAVORITES_KEY)
            .await
            .map_err(FavoritesError::Persistence)?;

        let favorites = match raw.as_deref().map(decode).transpose() {
            Ok(favorites) => favorites.unwrap_or_default(),
            Err(err) => {
                tracing::warn!(error = %err, "persisted favorites are corrupt, starting empty");
                self.state.send_replace(Vec::new());
                self.ready.store(true, Ordering::SeqCst);
                return Err(FavoritesError::Deserialization(err));
            }
        };

        let count = favorites.len();
        self.state.send_replace(favorites);
        self.ready.store(true, Ordering::SeqCst);
        tracing::debug!(count, "favorites loaded");
        Ok(count)
    }

    /// Adds a favorite.
    ///
    /// Returns `false` without writing if a favorite with the same id exists.
    ///
    /// # Errors
    ///
    /// - `FavoritesError::NotReady` before `load` or after `close`.
    /// - `FavoritesError::Persistence` if the write fails; the in-memory
    ///   collection is left unchanged.
    #[instrument(skip_all, fields(id = %movie.id))]
    pub async fn add(&self, movie: FavoriteMovie) -> Result<bool, FavoritesError> {
        let _queue = self.mutation.lock().await;
        self.ensure_ready()?;
        self.insert_locked(movie).await
    }

    /// Removes the favorite with `id`.
    ///
    /// Returns `false` without writing if no such favorite exists.
    ///
    /// # Errors
    ///
    /// Same as [`FavoritesStore::add`].
    #[instrument(skip_all, fields(id = %id))]
    pub async fn remove(&self, id: &str) -> Result<bool, FavoritesError> {
        let _queue = self.mutation.lock().await;
        self.ensure_ready()?;
        self.delete_locked(id).await
    }

    /// Removes the movie if it is a favorite, adds it otherwise.
    ///
    /// Returns the new membership.
    ///
    /// # Errors
    ///
    /// Same as [`FavoritesStore::add`].
    #[instrument(skip_all, fields(id = %movie.id))]
    pub async fn toggle(&self, movie: FavoriteMovie) -> Result<bool, FavoritesError> {
        let _queue = self.mutation.lock().await;
        self.ensure_ready()?;
        if self.is_favorite(&movie.id) {
            self.delete_locked(&movie.id).await?;
            Ok(false)
        } else {
            self.insert_locked(movie).await?;
            Ok(true)
        }
    }

    /// Waits for queued mutations, then marks the store not ready.
    pub async fn close(&self) {
        let _queue = self.mutation.lock().await;
        self.ready.store(false, Ordering::SeqCst);
        tracing::debug!("favorites store closed");
    }

    /// Returns `true` if a favorite with `id` exists. Never touches storage.
    #[must_use]
    pub fn is_favorite(&self, id: &str) -> bool {
        self.state.borrow().iter().any(|f| f.id == id)
    }

    /// Returns a copy of the collection in insertion order.
    #[must_use]
    pub fn favorites(&self) -> Vec<FavoriteMovie> {
        self.state.borrow().clone()
    }

    /// Number of favorites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.borrow().len()
    }

    /// Returns `true` if there are no favorites.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.borrow().is_empty()
    }

    /// Returns `true` between `load` and `close`.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    /// Subscribes to collection changes.
    ///
    /// The receiver sees the current collection and every successful mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<FavoriteMovie>> {
        self.state.subscribe()
    }

    fn ensure_ready(&self) -> Result<(), FavoritesError> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(FavoritesError::NotReady)
        }
    }

    /// Appends `movie` unless present. Caller holds the mutation queue.
    async fn insert_locked(&self, movie: FavoriteMovie) -> Result<bool, FavoritesError> {
        if self.is_favorite(&movie.id) {
            tracing::debug!("movie already in favorites");
            return Ok(false);
        }
        let mut next = self.favorites();
        next.push(movie);
        self.commit(next).await?;
        tracing::info!("added favorite");
        Ok(true)
    }

    /// Drops the entry with `id` if present. Caller holds the mutation queue.
    async fn delete_locked(&self, id: &str) -> Result<bool, FavoritesError> {
        let mut next = self.favorites();
        let before = next.len();
        next.retain(|f| f.id != id);
        if next.len() == before {
            return Ok(false);
        }
        self.commit(next).await?;
        tracing::info!(id, "removed favorite");
        Ok(true)
    }

    /// Persists `next` in full, then publishes it.
    async fn commit(&self, next: Vec<FavoriteMovie>) -> Result<(), FavoritesError> {
        let raw = serde_json::to_string(&next)
            .map_err(|err| FavoritesError::Persistence(anyhow::Error::new(err)))?;
        if let Err(err) = self.kv.set(FAVORITES_KEY, &raw).await {
            tracing::warn!(error = %format!("{err:#}"), "failed to persist favorites");
            return Err(FavoritesError::Persistence(err));
        }
        self.state.send_replace(next);
        Ok(())
    }
}
