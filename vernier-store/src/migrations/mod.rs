//! Numbered schema migrations gated on `PRAGMA user_version`.

pub mod v001_core_tables;
pub mod v002_run_locks;

use rusqlite::Connection;
use tracing::info;
use vernier_core::errors::StoreError;

use crate::to_store_err;

/// The schema version this build expects.
pub const CURRENT_VERSION: u32 = 2;

/// Run every migration the database has not seen yet.
pub fn run_migrations(conn: &Connection) -> Result<(), StoreError> {
    let mut version = user_version(conn)?;

    if version < 1 {
        apply(conn, 1, v001_core_tables::migrate)?;
        version = 1;
    }
    if version < 2 {
        apply(conn, 2, v002_run_locks::migrate)?;
    }

    Ok(())
}

fn apply(
    conn: &Connection,
    version: u32,
    migrate: fn(&Connection) -> Result<(), StoreError>,
) -> Result<(), StoreError> {
    migrate(conn).map_err(|e| StoreError::MigrationFailed {
        version,
        reason: e.to_string(),
    })?;
    set_user_version(conn, version)?;
    info!(version, "schema migration applied");
    Ok(())
}

/// Read the schema version stamped on the database.
pub fn user_version(conn: &Connection) -> Result<u32, StoreError> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| to_store_err(e.to_string()))
}

fn set_user_version(conn: &Connection, version: u32) -> Result<(), StoreError> {
    conn.pragma_update(None, "user_version", version)
        .map_err(|e| to_store_err(e.to_string()))
}
