//! Persistent key-value storage for cinefav.
//!
//! Uses `rusqlite` (bundled `SQLite`) for a single `kv` table holding
//! whole serialized documents under fixed keys, plus an in-memory
//! store for tests and ephemeral sessions.

mod connection;
/// Synchronous `kv` table operations.
pub mod kv;
mod memory;
mod migrations;
mod store;

#[allow(clippy::module_name_repetitions)]
pub use connection::{open_db, open_in_memory};
pub use memory::MemoryKvStore;
#[allow(clippy::module_name_repetitions)]
pub use store::{KeyValueStore, LocalKeyValueStore, SqliteKvStore};
