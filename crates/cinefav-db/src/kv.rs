//! `kv` table CRUD operations.

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension};

/// Reads the value stored under `key`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_value(conn: &Connection, key: &str) -> Result<Option<String>> {
    conn.query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
        row.get(0)
    })
    .optional()
    .with_context(|| format!("failed to read key {key}"))
}

/// Stores `value` under `key`, replacing any previous value.
///
/// The replacement is a single statement, so readers never observe a
/// partially written document.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn set_value(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
         ON CONFLICT(key) DO UPDATE SET
             value = excluded.value,
             updated_at = excluded.updated_at",
        [key, value],
    )
    .with_context(|| format!("failed to write key {key}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::connection::open_in_memory;

    #[test]
    fn test_get_missing_key_returns_none() {
        // Arrange
        let conn = open_in_memory().unwrap();

        // Act
        let value = get_value(&conn, "@movie_favorites").unwrap();

        // Assert
        assert!(value.is_none());
    }

    #[test]
    fn test_set_replaces_previous_value() {
        // Arrange
        let conn = open_in_memory().unwrap();
        set_value(&conn, "k", "[1]").unwrap();

        // Act
        set_value(&conn, "k", "[1,2]").unwrap();

        // Assert
        assert_eq!(get_value(&conn, "k").unwrap().as_deref(), Some("[1,2]"));
        let count: u32 = conn
            .query_row("SELECT COUNT(*) FROM kv", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
