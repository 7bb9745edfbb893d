//! PRAGMA configuration applied to every SQLite connection.
//!
//! WAL mode, NORMAL sync, 5s busy_timeout, foreign_keys ON. The busy
//! timeout matters here: the webapp writes to the same database file, so
//! lock contention is expected, not exceptional.

use rusqlite::Connection;
use vernier_core::errors::StoreError;

use crate::to_store_err;

/// Apply all safety and performance pragmas to a write connection.
pub fn apply_pragmas(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        PRAGMA foreign_keys = ON;
        ",
    )
    .map_err(|e| to_store_err(e.to_string()))?;
    Ok(())
}

/// Pragmas for read connections; journal mode is inherited from the file.
pub fn apply_read_pragmas(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch("PRAGMA busy_timeout = 5000;")
        .map_err(|e| to_store_err(e.to_string()))?;
    Ok(())
}

/// Verify that WAL mode is active on a connection.
pub fn verify_wal_mode(conn: &Connection) -> Result<bool, StoreError> {
    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .map_err(|e| to_store_err(e.to_string()))?;
    Ok(mode.eq_ignore_ascii_case("wal"))
}
