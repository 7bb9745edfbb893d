//! The single write connection. SQLite allows one writer at a time; a
//! mutex serializes this process's writes instead of letting them fight
//! over the file lock.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;
use vernier_core::errors::StoreError;

use super::pragmas::apply_pragmas;
use crate::to_store_err;

pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| to_store_err(e.to_string()))?;
        apply_pragmas(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|e| to_store_err(e.to_string()))?;
        apply_pragmas(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Execute a closure holding the writer for its duration.
    pub fn with_conn_sync<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError>,
    {
        let guard = self.conn.lock().map_err(|e| StoreError::LockPoisoned {
            message: format!("write connection: {e}"),
        })?;
        f(&guard)
    }
}
