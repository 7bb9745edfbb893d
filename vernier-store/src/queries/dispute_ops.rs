//! Insert, get, review-queue, tally queries and the provisional grant
//! transaction for disputes.

use std::collections::HashMap;

use rusqlite::types::Value;
use rusqlite::{params, Connection, OptionalExtension};

use vernier_core::errors::StoreError;
use vernier_core::traits::{GrantOutcome, ProvisionalGrant};
use vernier_core::{Dispute, DisputeStatus, DisputeTally, Notification};

use crate::to_store_err;

use super::{instant_at, malformed, notification_ops, opt_instant_at, value_to_instant};

const DISPUTE_COLUMNS: &str =
    "id, product_sku, created_by, created_at, status, resolution_pending_at, provisional_editor";

/// Insert a dispute, or replace every field if the id already exists.
pub fn upsert_dispute(conn: &Connection, dispute: &Dispute) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO disputes (
            id, product_sku, created_by, created_at, status,
            resolution_pending_at, provisional_editor
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        ON CONFLICT(id) DO UPDATE SET
            product_sku = excluded.product_sku,
            created_by = excluded.created_by,
            created_at = excluded.created_at,
            status = excluded.status,
            resolution_pending_at = excluded.resolution_pending_at,
            provisional_editor = excluded.provisional_editor",
        params![
            dispute.id,
            dispute.product_sku,
            dispute.created_by,
            dispute.created_at.to_rfc3339(),
            dispute.status.as_str(),
            dispute.resolution_pending_at.map(|t| t.to_rfc3339()),
            dispute.provisional_editor,
        ],
    )
    .map_err(|e| to_store_err(e.to_string()))?;
    Ok(())
}

/// Get a single dispute by id.
pub fn get_dispute(conn: &Connection, id: &str) -> Result<Option<Dispute>, StoreError> {
    let mut stmt = conn
        .prepare(&format!("SELECT {DISPUTE_COLUMNS} FROM disputes WHERE id = ?1"))
        .map_err(|e| to_store_err(e.to_string()))?;

    let result = stmt
        .query_row(params![id], |row| Ok(row_to_dispute(row)))
        .optional()
        .map_err(|e| to_store_err(e.to_string()))?;

    match result {
        Some(Ok(dispute)) => Ok(Some(dispute)),
        Some(Err(e)) => Err(e),
        None => Ok(None),
    }
}

/// The escalation working set: disputes sitting in review with a stamped
/// deadline, oldest deadline first. Unreadable rows are skipped with a
/// warning, matching `list_products`.
pub fn pending_review(conn: &Connection) -> Result<Vec<Dispute>, StoreError> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {DISPUTE_COLUMNS} FROM disputes
             WHERE status = 'in_review' AND resolution_pending_at IS NOT NULL
             ORDER BY resolution_pending_at"
        ))
        .map_err(|e| to_store_err(e.to_string()))?;

    let mut rows = stmt
        .query([])
        .map_err(|e| to_store_err(e.to_string()))?;

    let mut disputes = Vec::new();
    while let Some(row) = rows.next().map_err(|e| to_store_err(e.to_string()))? {
        match row_to_dispute(row) {
            Ok(dispute) => disputes.push(dispute),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable dispute row");
            }
        }
    }
    Ok(disputes)
}

/// Status counts per product in one grouped query. Rows carrying a status
/// label the engine does not know are skipped with a warning.
pub fn dispute_tallies(conn: &Connection) -> Result<HashMap<String, DisputeTally>, StoreError> {
    let mut stmt = conn
        .prepare(
            "SELECT product_sku, status, COUNT(*) FROM disputes GROUP BY product_sku, status",
        )
        .map_err(|e| to_store_err(e.to_string()))?;

    let mut rows = stmt
        .query([])
        .map_err(|e| to_store_err(e.to_string()))?;

    let mut tallies: HashMap<String, DisputeTally> = HashMap::new();
    while let Some(row) = rows.next().map_err(|e| to_store_err(e.to_string()))? {
        let sku: String = row.get(0).map_err(|e| to_store_err(e.to_string()))?;
        let status_str: String = row.get(1).map_err(|e| to_store_err(e.to_string()))?;
        let count: i64 = row.get(2).map_err(|e| to_store_err(e.to_string()))?;

        let Ok(status) = status_str.parse::<DisputeStatus>() else {
            tracing::warn!(sku = %sku, status = %status_str, "skipping unknown dispute status in tally");
            continue;
        };
        let n = count.max(0) as u32;
        let tally = tallies.entry(sku).or_default();
        match status {
            DisputeStatus::Open => tally.open += n,
            DisputeStatus::InReview => tally.in_review += n,
            DisputeStatus::Resolved => tally.resolved += n,
            DisputeStatus::Rejected => tally.rejected += n,
        }
    }
    Ok(tallies)
}

/// Commit one provisional grant, or report which re-check lost the race.
///
/// Dispute grant slot, product identity, product modification time and
/// product grant slot are all verified inside the same write transaction
/// that performs the three writes. A failed check rolls everything back,
/// so no partial grant is ever visible.
pub fn grant_provisional_edit(
    conn: &Connection,
    grant: &ProvisionalGrant,
) -> Result<GrantOutcome, StoreError> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_store_err(format!("grant begin: {e}")))?;

    match grant_inner(&tx, grant) {
        Ok(GrantOutcome::Granted) => {
            tx.commit()
                .map_err(|e| to_store_err(format!("grant commit: {e}")))?;
            Ok(GrantOutcome::Granted)
        }
        Ok(outcome) => {
            let _ = tx.rollback();
            Ok(outcome)
        }
        Err(e) => {
            let _ = tx.rollback();
            Err(e)
        }
    }
}

/// Inner grant logic, operating on the provided transaction via Deref.
fn grant_inner(conn: &Connection, grant: &ProvisionalGrant) -> Result<GrantOutcome, StoreError> {
    // Re-check the dispute's grant slot. A vanished dispute can no longer
    // accept a grant, which reads the same as an already-filled slot.
    let dispute_slot: Option<Option<String>> = conn
        .query_row(
            "SELECT provisional_editor FROM disputes WHERE id = ?1",
            params![grant.dispute_id],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| to_store_err(e.to_string()))?;

    match dispute_slot {
        None | Some(Some(_)) => return Ok(GrantOutcome::DisputeAlreadyGranted),
        Some(None) => {}
    }

    // Re-check the product: it must still exist, its modification time must
    // match what the engine observed, and its grant slot must be empty.
    let product_state: Option<(Option<String>, Value)> = conn
        .query_row(
            "SELECT provisional_editor, last_modified FROM products WHERE sku = ?1",
            params![grant.product_sku],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()
        .map_err(|e| to_store_err(e.to_string()))?;

    let Some((product_slot, raw_modified)) = product_state else {
        return Ok(GrantOutcome::ProductChanged);
    };

    let stored_modified = value_to_instant(&raw_modified).ok_or_else(|| {
        malformed(&grant.product_sku, "last_modified", "unrecognized timestamp value")
    })?;
    if stored_modified != grant.observed_modified {
        return Ok(GrantOutcome::ProductChanged);
    }
    if product_slot.is_some() {
        return Ok(GrantOutcome::ProductOccupied);
    }

    // All re-checks passed: write both grant slots and the notification
    // together. The product write is field-scoped, `last_modified` stays
    // untouched so a grant never masquerades as a content edit.
    conn.execute(
        "UPDATE disputes SET provisional_editor = ?2 WHERE id = ?1",
        params![grant.dispute_id, grant.editor],
    )
    .map_err(|e| to_store_err(e.to_string()))?;

    conn.execute(
        "UPDATE products SET provisional_editor = ?2 WHERE sku = ?1",
        params![grant.product_sku, grant.editor],
    )
    .map_err(|e| to_store_err(e.to_string()))?;

    let stored = Notification::issue(grant.notification.clone());
    notification_ops::insert_notification(conn, &stored)?;

    Ok(GrantOutcome::Granted)
}

/// Parse a row from the disputes table into a Dispute.
pub(crate) fn row_to_dispute(row: &rusqlite::Row<'_>) -> Result<Dispute, StoreError> {
    let id: String = row.get(0).map_err(|e| to_store_err(e.to_string()))?;
    let status_str: String = row.get(4).map_err(|e| to_store_err(e.to_string()))?;
    let status = status_str
        .parse::<DisputeStatus>()
        .map_err(|e| malformed(&id, "status", e))?;

    Ok(Dispute {
        product_sku: row.get(1).map_err(|e| to_store_err(e.to_string()))?,
        created_by: row.get(2).map_err(|e| to_store_err(e.to_string()))?,
        created_at: instant_at(row, 3, &id, "created_at")?,
        status,
        resolution_pending_at: opt_instant_at(row, 5, &id, "resolution_pending_at")?,
        provisional_editor: row.get(6).map_err(|e| to_store_err(e.to_string()))?,
        id,
    })
}
