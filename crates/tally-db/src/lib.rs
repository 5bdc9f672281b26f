//! # tally-db
//!
//! Database access layer for the tally daemon.
//! Manages the single SQLite database at `$TALLY_DATA_DIR/tally.db`.
//!
//! ## Schema
//!
//! One table per counter family, each keyed first by `guild_id`:
//! - WAL mode mandatory
//! - All counters are non-negative integers
//! - Campaign timestamps are Unix epoch seconds
//! - Schema version stored in `PRAGMA user_version`
//!
//! Every counter mutation is a single `INSERT .. ON CONFLICT DO UPDATE`
//! statement that creates the row at zero, applies the delta, and clamps
//! at zero in one step. There is never a separate existence check followed
//! by an update, so concurrent increments on the same key cannot lose
//! writes.

pub mod migrations;
pub mod queries;
pub mod schema;

use rusqlite::Connection;
use std::path::Path;

/// Current schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Database error types.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("migration failed: {0}")]
    Migration(String),

    #[error("not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, DbError>;

/// Open or create the tally database at the given path.
///
/// Configures WAL mode and runs any pending migrations.
pub fn open(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    configure(&conn)?;
    migrations::run(&conn)?;
    Ok(conn)
}

/// Open an in-memory database (for testing).
pub fn open_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure(&conn)?;
    migrations::run(&conn)?;
    Ok(conn)
}

/// Configure SQLite pragmas.
fn configure(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = 5000;
         PRAGMA synchronous = NORMAL;",
    )?;
    Ok(())
}
