//! Opening the favorites database.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use rusqlite::Connection;

use super::migrations::run_migrations;

/// Database file name.
const DB_FILE_NAME: &str = "cinefav.db";

/// Application directory under the base data directory.
const APP_DIR: &str = "cinefav";

/// Opens (or creates) the database and brings its schema up to date.
///
/// The file lives at `{dir}/cinefav.db` when `dir` is given, otherwise at
/// `$XDG_DATA_HOME/cinefav/cinefav.db` (default `~/.local/share`).
///
/// # Errors
///
/// Returns an error if the directory cannot be created, the database cannot
/// be opened, or migrations fail.
pub fn open_db(dir: Option<&PathBuf>) -> Result<Connection> {
    let db_path = match dir {
        Some(dir) => dir.join(DB_FILE_NAME),
        None => data_home(std::env::var("XDG_DATA_HOME").ok(), std::env::var("HOME").ok())?
            .join(APP_DIR)
            .join(DB_FILE_NAME),
    };

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let conn = Connection::open(&db_path)
        .with_context(|| format!("failed to open database {}", db_path.display()))?;
    run_migrations(&conn).context("database migration failed")?;

    tracing::debug!(path = %db_path.display(), "database opened");
    Ok(conn)
}

/// Opens a migrated in-memory database.
///
/// # Errors
///
/// Returns an error if `SQLite` cannot allocate the database or migrations fail.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
    run_migrations(&conn).context("database migration failed")?;
    Ok(conn)
}

/// Picks the base data directory from `XDG_DATA_HOME`, then `HOME`.
fn data_home(xdg_data_home: Option<String>, home: Option<String>) -> Result<PathBuf> {
    if let Some(xdg) = xdg_data_home.filter(|v| Path::new(v).is_absolute()) {
        return Ok(PathBuf::from(xdg));
    }
    match home.filter(|v| !v.is_empty()) {
        Some(home) => Ok(Path::new(&home).join(".local").join("share")),
        None => bail!("neither XDG_DATA_HOME nor HOME is set"),
    }
}
