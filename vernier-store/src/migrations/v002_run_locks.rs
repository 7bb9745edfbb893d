//! v002: run_locks.

use rusqlite::Connection;
use vernier_core::errors::StoreError;

use crate::to_store_err;

pub fn migrate(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS run_locks (
            name         TEXT PRIMARY KEY,
            holder       TEXT NOT NULL,
            acquired_at  TEXT NOT NULL,
            expires_at   TEXT NOT NULL
        );
        ",
    )
    .map_err(|e| to_store_err(e.to_string()))?;
    Ok(())
}
