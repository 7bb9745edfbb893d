//! Advisory run locks. One row per component keeps overlapping batch
//! runs (same host or another) from double-processing the same data.

use chrono::{Duration, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use vernier_core::errors::StoreError;

use crate::to_store_err;

use super::{malformed, value_to_instant};

/// Try to take the named lock for `holder`. Succeeds when the lock is
/// free, already held by the same holder (refresh), or expired (takeover).
/// The check and the write share one transaction.
pub fn try_acquire(
    conn: &Connection,
    name: &str,
    holder: &str,
    ttl_secs: u64,
) -> Result<bool, StoreError> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_store_err(format!("lock begin: {e}")))?;

    let now = Utc::now();
    let expires_at = now + Duration::seconds(ttl_secs.min(i64::MAX as u64) as i64);

    let current: Option<(String, rusqlite::types::Value)> = tx
        .query_row(
            "SELECT holder, expires_at FROM run_locks WHERE name = ?1",
            params![name],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()
        .map_err(|e| to_store_err(e.to_string()))?;

    let acquired = match current {
        None => {
            tx.execute(
                "INSERT INTO run_locks (name, holder, acquired_at, expires_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![name, holder, now.to_rfc3339(), expires_at.to_rfc3339()],
            )
            .map_err(|e| to_store_err(e.to_string()))?;
            true
        }
        Some((current_holder, raw_expires)) => {
            let current_expiry = value_to_instant(&raw_expires)
                .ok_or_else(|| malformed(name, "expires_at", "unrecognized timestamp value"))?;

            if current_holder != holder && current_expiry > now {
                false
            } else {
                if current_holder != holder {
                    tracing::warn!(
                        lock = %name,
                        stale_holder = %current_holder,
                        "taking over expired run lock"
                    );
                }
                tx.execute(
                    "UPDATE run_locks SET holder = ?2, acquired_at = ?3, expires_at = ?4
                     WHERE name = ?1",
                    params![name, holder, now.to_rfc3339(), expires_at.to_rfc3339()],
                )
                .map_err(|e| to_store_err(e.to_string()))?;
                true
            }
        }
    };

    tx.commit()
        .map_err(|e| to_store_err(format!("lock commit: {e}")))?;
    Ok(acquired)
}

/// Drop the named lock, but only if `holder` still owns it. Releasing a
/// lock another process took over is a no-op.
pub fn release(conn: &Connection, name: &str, holder: &str) -> Result<(), StoreError> {
    conn.execute(
        "DELETE FROM run_locks WHERE name = ?1 AND holder = ?2",
        params![name, holder],
    )
    .map_err(|e| to_store_err(e.to_string()))?;
    Ok(())
}
