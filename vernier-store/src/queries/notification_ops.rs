//! Insert and feed queries for notifications. The localized message body
//! is stored as a JSON object in the `message` column.

use rusqlite::{params, Connection};

use vernier_core::errors::StoreError;
use vernier_core::{LocalizedText, Notification, NotificationKind};

use crate::to_store_err;

use super::{instant_at, malformed};

const NOTIFICATION_COLUMNS: &str =
    "id, user_id, kind, product_sku, dispute_id, message, status, read, created_at";

/// Insert an already-stamped notification. Also called from inside the
/// grant transaction, so this must stay a single statement.
pub fn insert_notification(conn: &Connection, notification: &Notification) -> Result<(), StoreError> {
    let message_json =
        serde_json::to_string(&notification.message).map_err(|e| to_store_err(e.to_string()))?;

    conn.execute(
        "INSERT INTO notifications (
            id, user_id, kind, product_sku, dispute_id,
            message, status, read, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            notification.id,
            notification.user_id,
            notification.kind.as_str(),
            notification.product_sku,
            notification.dispute_id,
            message_json,
            notification.status,
            notification.read as i32,
            notification.created_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_store_err(e.to_string()))?;
    Ok(())
}

/// Newest-first feed for one user. These rows are this engine's own
/// writes, so a malformed one is propagated, never skipped.
pub fn notifications_for(conn: &Connection, user_id: &str) -> Result<Vec<Notification>, StoreError> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications
             WHERE user_id = ?1
             ORDER BY created_at DESC"
        ))
        .map_err(|e| to_store_err(e.to_string()))?;

    let mut rows = stmt
        .query(params![user_id])
        .map_err(|e| to_store_err(e.to_string()))?;

    let mut notifications = Vec::new();
    while let Some(row) = rows.next().map_err(|e| to_store_err(e.to_string()))? {
        notifications.push(row_to_notification(row)?);
    }
    Ok(notifications)
}

/// Parse a row from the notifications table into a Notification.
fn row_to_notification(row: &rusqlite::Row<'_>) -> Result<Notification, StoreError> {
    let id: String = row.get(0).map_err(|e| to_store_err(e.to_string()))?;
    let kind_str: String = row.get(2).map_err(|e| to_store_err(e.to_string()))?;
    let message_json: String = row.get(5).map_err(|e| to_store_err(e.to_string()))?;

    let kind = kind_str
        .parse::<NotificationKind>()
        .map_err(|e| malformed(&id, "kind", e))?;
    let message: LocalizedText = serde_json::from_str(&message_json)
        .map_err(|e| malformed(&id, "message", e.to_string()))?;

    Ok(Notification {
        user_id: row.get(1).map_err(|e| to_store_err(e.to_string()))?,
        kind,
        product_sku: row.get(3).map_err(|e| to_store_err(e.to_string()))?,
        dispute_id: row.get(4).map_err(|e| to_store_err(e.to_string()))?,
        message,
        status: row.get(6).map_err(|e| to_store_err(e.to_string()))?,
        read: row
            .get::<_, i64>(7)
            .map_err(|e| to_store_err(e.to_string()))?
            != 0,
        created_at: instant_at(row, 8, &id, "created_at")?,
        id,
    })
}
