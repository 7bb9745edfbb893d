//! Grant transaction tests: every re-check, and the all-or-nothing
//! commit of both grant slots plus the notification row.

use chrono::{DateTime, Duration, TimeZone, Utc};
use vernier_core::traits::{
    DisputeStore, GrantOutcome, NotificationSink, ProductStore, ProvisionalGrant,
};
use vernier_core::{
    Confidence, Dispute, DisputeStatus, LocalizedText, NewNotification, NotificationKind, Product,
};
use vernier_store::{to_store_err, StorageEngine};

fn reference() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

fn seed(engine: &StorageEngine, sku: &str, dispute_id: &str) -> (Product, Dispute) {
    let product = Product {
        sku: sku.to_string(),
        name: format!("Product {sku}"),
        likes: 3,
        views: 15,
        created_at: reference() - Duration::days(60),
        created_by: "u-author".to_string(),
        last_modified: reference() - Duration::days(30),
        last_modified_by: Some("u-author".to_string()),
        provisional_editor: None,
        confidence: Confidence::new(85),
    };
    let dispute = Dispute {
        id: dispute_id.to_string(),
        product_sku: sku.to_string(),
        created_by: "u-reporter".to_string(),
        created_at: reference() - Duration::days(12),
        status: DisputeStatus::InReview,
        resolution_pending_at: Some(reference() - Duration::days(10)),
        provisional_editor: None,
    };
    engine.upsert_product(&product).unwrap();
    engine.upsert_dispute(&dispute).unwrap();
    (product, dispute)
}

fn make_grant(product: &Product, dispute: &Dispute) -> ProvisionalGrant {
    ProvisionalGrant {
        dispute_id: dispute.id.clone(),
        product_sku: product.sku.clone(),
        editor: dispute.created_by.clone(),
        observed_modified: product.last_modified,
        notification: NewNotification {
            user_id: dispute.created_by.clone(),
            kind: NotificationKind::ProvisionalEdit,
            product_sku: product.sku.clone(),
            dispute_id: dispute.id.clone(),
            message: LocalizedText::new("you may edit"),
            status: "Granted".to_string(),
        },
    }
}

fn raw_last_modified(engine: &StorageEngine, sku: &str) -> String {
    engine
        .pool()
        .writer
        .with_conn_sync(|conn| {
            conn.query_row(
                "SELECT last_modified FROM products WHERE sku = ?1",
                [sku],
                |row| row.get(0),
            )
            .map_err(|e| to_store_err(e.to_string()))
        })
        .unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════
// THE HAPPY PATH
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn grant_commits_both_slots_and_the_notification() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let (product, dispute) = seed(&engine, "sku-1", "d-1");

    let outcome = engine
        .grant_provisional_edit(&make_grant(&product, &dispute))
        .unwrap();
    assert_eq!(outcome, GrantOutcome::Granted);
    assert!(outcome.is_granted());

    let dispute_after = engine.get_dispute("d-1").unwrap().unwrap();
    assert_eq!(dispute_after.provisional_editor.as_deref(), Some("u-reporter"));

    let product_after = engine.get_product("sku-1").unwrap().unwrap();
    assert_eq!(product_after.provisional_editor.as_deref(), Some("u-reporter"));

    let feed = engine.notifications_for("u-reporter").unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].kind, NotificationKind::ProvisionalEdit);
    assert_eq!(feed[0].dispute_id, "d-1");
    assert_eq!(feed[0].product_sku, "sku-1");
    assert!(!feed[0].read);
}

#[test]
fn grant_never_touches_last_modified() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let (product, dispute) = seed(&engine, "sku-1", "d-1");

    let before = raw_last_modified(&engine, "sku-1");
    engine
        .grant_provisional_edit(&make_grant(&product, &dispute))
        .unwrap();
    let after = raw_last_modified(&engine, "sku-1");

    // Byte-identical: a grant is not an edit.
    assert_eq!(before, after);
}

// ═══════════════════════════════════════════════════════════════════════════
// RE-CHECKS: every skip outcome rolls the whole transaction back
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn stale_observation_loses_and_rolls_back() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let (product, dispute) = seed(&engine, "sku-1", "d-1");

    let mut grant = make_grant(&product, &dispute);
    // The owner edited after the engine looked.
    grant.observed_modified = product.last_modified - Duration::hours(1);

    let outcome = engine.grant_provisional_edit(&grant).unwrap();
    assert_eq!(outcome, GrantOutcome::ProductChanged);

    // Nothing was written: no slot on either side, no notification.
    let dispute_after = engine.get_dispute("d-1").unwrap().unwrap();
    assert_eq!(dispute_after.provisional_editor, None);
    let product_after = engine.get_product("sku-1").unwrap().unwrap();
    assert_eq!(product_after.provisional_editor, None);
    assert!(engine.notifications_for("u-reporter").unwrap().is_empty());
}

#[test]
fn missing_product_is_product_changed() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let (product, dispute) = seed(&engine, "sku-1", "d-1");

    engine
        .pool()
        .writer
        .with_conn_sync(|conn| {
            conn.execute("DELETE FROM products WHERE sku = 'sku-1'", [])
                .map_err(|e| to_store_err(e.to_string()))?;
            Ok(())
        })
        .unwrap();

    let outcome = engine
        .grant_provisional_edit(&make_grant(&product, &dispute))
        .unwrap();
    assert_eq!(outcome, GrantOutcome::ProductChanged);
}

#[test]
fn filled_dispute_slot_is_already_granted() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let (product, mut dispute) = seed(&engine, "sku-1", "d-1");

    dispute.provisional_editor = Some("u-reporter".to_string());
    engine.upsert_dispute(&dispute).unwrap();

    let outcome = engine
        .grant_provisional_edit(&make_grant(&product, &dispute))
        .unwrap();
    assert_eq!(outcome, GrantOutcome::DisputeAlreadyGranted);
    assert!(engine.notifications_for("u-reporter").unwrap().is_empty());
}

#[test]
fn vanished_dispute_is_already_granted() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let (product, dispute) = seed(&engine, "sku-1", "d-1");

    engine
        .pool()
        .writer
        .with_conn_sync(|conn| {
            conn.execute("DELETE FROM disputes WHERE id = 'd-1'", [])
                .map_err(|e| to_store_err(e.to_string()))?;
            Ok(())
        })
        .unwrap();

    let outcome = engine
        .grant_provisional_edit(&make_grant(&product, &dispute))
        .unwrap();
    // A dispute that no longer exists can no longer accept a grant.
    assert_eq!(outcome, GrantOutcome::DisputeAlreadyGranted);
}

#[test]
fn occupied_product_blocks_the_grant() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let (mut product, dispute) = seed(&engine, "sku-1", "d-1");

    product.provisional_editor = Some("u-other-reporter".to_string());
    engine.upsert_product(&product).unwrap();

    let outcome = engine
        .grant_provisional_edit(&make_grant(&product, &dispute))
        .unwrap();
    assert_eq!(outcome, GrantOutcome::ProductOccupied);

    // The losing dispute's slot stays empty.
    let dispute_after = engine.get_dispute("d-1").unwrap().unwrap();
    assert_eq!(dispute_after.provisional_editor, None);
}

#[test]
fn two_disputes_one_product_first_wins() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let (product, d1) = seed(&engine, "sku-1", "d-1");
    let d2 = Dispute {
        id: "d-2".to_string(),
        created_by: "u-second".to_string(),
        ..d1.clone()
    };
    engine.upsert_dispute(&d2).unwrap();

    assert_eq!(
        engine.grant_provisional_edit(&make_grant(&product, &d1)).unwrap(),
        GrantOutcome::Granted
    );
    assert_eq!(
        engine.grant_provisional_edit(&make_grant(&product, &d2)).unwrap(),
        GrantOutcome::ProductOccupied
    );

    // Exactly one dispute holds the slot and one notification went out.
    assert_eq!(
        engine.get_dispute("d-1").unwrap().unwrap().provisional_editor.as_deref(),
        Some("u-reporter")
    );
    assert_eq!(engine.get_dispute("d-2").unwrap().unwrap().provisional_editor, None);
    assert_eq!(engine.notifications_for("u-reporter").unwrap().len(), 1);
    assert!(engine.notifications_for("u-second").unwrap().is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════
// PERSISTENCE
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn grant_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("grant.db");

    {
        let engine = StorageEngine::open(&db_path).unwrap();
        let (product, dispute) = seed(&engine, "sku-1", "d-1");
        assert_eq!(
            engine.grant_provisional_edit(&make_grant(&product, &dispute)).unwrap(),
            GrantOutcome::Granted
        );
    }

    {
        let engine = StorageEngine::open(&db_path).unwrap();
        assert_eq!(
            engine.get_product("sku-1").unwrap().unwrap().provisional_editor.as_deref(),
            Some("u-reporter")
        );
        assert_eq!(
            engine.get_dispute("d-1").unwrap().unwrap().provisional_editor.as_deref(),
            Some("u-reporter")
        );
        assert_eq!(engine.notifications_for("u-reporter").unwrap().len(), 1);
    }

    dir.close().unwrap();
}
