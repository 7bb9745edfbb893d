//! v001: products, disputes, notifications.

use rusqlite::Connection;
use vernier_core::errors::StoreError;

use crate::to_store_err;

pub fn migrate(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS products (
            sku                 TEXT PRIMARY KEY,
            name                TEXT NOT NULL,
            likes               INTEGER NOT NULL DEFAULT 0,
            views               INTEGER NOT NULL DEFAULT 0,
            created_at          TEXT NOT NULL,
            created_by          TEXT NOT NULL,
            last_modified       TEXT NOT NULL,
            last_modified_by    TEXT,
            provisional_editor  TEXT,
            confidence          INTEGER NOT NULL DEFAULT 85
        );

        CREATE TABLE IF NOT EXISTS disputes (
            id                     TEXT PRIMARY KEY,
            product_sku            TEXT NOT NULL,
            created_by             TEXT NOT NULL,
            created_at             TEXT NOT NULL,
            status                 TEXT NOT NULL,
            resolution_pending_at  TEXT,
            provisional_editor     TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_disputes_status ON disputes(status);
        CREATE INDEX IF NOT EXISTS idx_disputes_product ON disputes(product_sku);

        CREATE TABLE IF NOT EXISTS notifications (
            id           TEXT PRIMARY KEY,
            user_id      TEXT NOT NULL,
            kind         TEXT NOT NULL,
            product_sku  TEXT NOT NULL,
            dispute_id   TEXT NOT NULL,
            message      TEXT NOT NULL,
            status       TEXT NOT NULL,
            read         INTEGER NOT NULL DEFAULT 0,
            created_at   TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_notifications_user
            ON notifications(user_id, created_at);
        ",
    )
    .map_err(|e| to_store_err(e.to_string()))?;
    Ok(())
}
