//! Key-value backend selection.

use std::path::PathBuf;

use anyhow::{Context, Result};
use cinefav_db::{KeyValueStore, MemoryKvStore, SqliteKvStore, open_db};

/// Backend chosen at startup: on-disk `SQLite` or process-local memory.
#[derive(Debug)]
pub enum Storage {
    /// `{dir}/cinefav.db` or `~/.local/share/cinefav/cinefav.db`.
    Sqlite(SqliteKvStore),
    /// Nothing survives the process (`--ephemeral`).
    Memory(MemoryKvStore),
}

impl Storage {
    /// Opens the backend for this run.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(dir: Option<&PathBuf>, ephemeral: bool) -> Result<Self> {
        if ephemeral {
            tracing::debug!("using in-memory storage");
            return Ok(Self::Memory(MemoryKvStore::new()));
        }
        let conn = open_db(dir).context("failed to open database")?;
        Ok(Self::Sqlite(SqliteKvStore::new(conn)))
    }
}

impl KeyValueStore for Storage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        match self {
            Self::Sqlite(store) => store.get(key).await,
            Self::Memory(store) => store.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        match self {
            Self::Sqlite(store) => store.set(key, value).await,
            Self::Memory(store) => store.set(key, value).await,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[tokio::test]
    async fn test_ephemeral_storage_is_memory() {
        // Arrange & Act
        let storage = Storage::open(None, true).unwrap();
        storage.set("k", "v").await.unwrap();

        // Assert
        assert!(matches!(storage, Storage::Memory(_)));
        assert_eq!(storage.get("k").await.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_sqlite_storage_in_dir() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let dir_path = dir.path().to_path_buf();

        // Act
        let storage = Storage::open(Some(&dir_path), false).unwrap();
        storage.set("k", "v").await.unwrap();
        let value = storage.get("k").await.unwrap();

        // Assert
        assert!(matches!(storage, Storage::Sqlite(_)));
        assert_eq!(value.as_deref(), Some("v"));
        assert!(dir_path.join("cinefav.db").exists());
    }
}
