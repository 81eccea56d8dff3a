//! Schema versioning through `PRAGMA user_version`.

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Ordered schema steps; step `i` moves the schema to version `i + 1`.
const STEPS: &[&str] = &["CREATE TABLE IF NOT EXISTS kv (
        key         TEXT PRIMARY KEY,
        value       TEXT NOT NULL,
        updated_at  TEXT NOT NULL DEFAULT (datetime('now'))
    );"];

/// Applies every step newer than the stored `user_version`.
///
/// Each step runs in its own transaction together with the version bump.
///
/// # Errors
///
/// Returns an error if the version cannot be read or a step fails.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    let current: u32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .context("failed to read user_version")?;

    for (version, sql) in (1_u32..).zip(STEPS).filter(|(v, _)| *v > current) {
        conn.execute_batch(&format!(
            "BEGIN;\n{sql}\nPRAGMA user_version = {version};\nCOMMIT;"
        ))
        .with_context(|| format!("migration to v{version} failed"))?;
        tracing::debug!(version, "schema migrated");
    }

    Ok(())
}
