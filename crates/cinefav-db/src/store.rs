//! `KeyValueStore` trait and the `SQLite`-backed implementation.
#![allow(clippy::future_not_send)]

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, anyhow};
use rusqlite::Connection;
use tracing::instrument;

use super::kv;

/// Asynchronous string key-value store.
///
/// Each value is an opaque document; `set` replaces it atomically from the
/// caller's point of view. Uses `trait_variant::make` to generate a
/// `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(KeyValueStore: Send)]
pub trait LocalKeyValueStore {
    /// Reads the raw value for `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the value for `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be written.
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// `SQLite`-backed key-value store.
///
/// `rusqlite` is blocking, so every call runs on Tokio's blocking pool.
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct SqliteKvStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteKvStore {
    /// Wraps an opened, migrated connection.
    #[must_use]
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Runs `f` with the connection on the blocking pool.
    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| anyhow!("database connection lock poisoned"))?;
            f(&guard)
        })
        .await
        .context("database task failed")?
    }
}

impl KeyValueStore for SqliteKvStore {
    #[instrument(skip_all, fields(key = %key))]
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let key = String::from(key);
        self.with_conn(move |conn| kv::get_value(conn, &key)).await
    }

    #[instrument(skip_all, fields(key = %key, bytes = value.len()))]
    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let key = String::from(key);
        let value = String::from(value);
        self.with_conn(move |conn| kv::set_value(conn, &key, &value))
            .await
    }
}
