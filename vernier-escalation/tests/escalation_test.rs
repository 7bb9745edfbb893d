use chrono::{DateTime, Duration, TimeZone, Utc};
use vernier_core::{Confidence, Dispute, DisputeStatus, Locale, NotificationKind, Product};
use vernier_escalation::eligibility::{
    confirm_grant, due_for_escalation, evaluate, Eligibility, SkipReason,
};
use vernier_escalation::notification::provisional_edit_notice;

fn anchor() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
}

const GRACE_DAYS: i64 = 7;

fn grace() -> Duration {
    Duration::days(GRACE_DAYS)
}

fn make_dispute(pending_days_ago: Option<i64>) -> Dispute {
    let now = anchor();
    Dispute {
        id: "d-1".to_string(),
        product_sku: "espresso-grinder-01".to_string(),
        created_by: "u-reporter".to_string(),
        created_at: now - Duration::days(30),
        status: DisputeStatus::InReview,
        resolution_pending_at: pending_days_ago.map(|d| now - Duration::days(d)),
        provisional_editor: None,
    }
}

fn make_product(modified: DateTime<Utc>) -> Product {
    Product {
        sku: "espresso-grinder-01".to_string(),
        name: "Espresso Grinder".to_string(),
        likes: 0,
        views: 0,
        created_at: anchor() - Duration::days(90),
        created_by: "u-owner".to_string(),
        last_modified: modified,
        last_modified_by: None,
        provisional_editor: None,
        confidence: Confidence::BASELINE,
    }
}

// ── Dispute-side checks ──────────────────────────────────────────────────

#[test]
fn overdue_dispute_is_due() {
    let dispute = make_dispute(Some(10));
    let pending = due_for_escalation(&dispute, anchor(), grace()).unwrap();
    assert_eq!(pending.editor, "u-reporter");
    assert_eq!(pending.pending_since, anchor() - Duration::days(10));
}

#[test]
fn grace_boundary_is_inclusive() {
    // 6 days 23 hours in: still within grace.
    let mut dispute = make_dispute(None);
    dispute.resolution_pending_at =
        Some(anchor() - Duration::days(6) - Duration::hours(23));
    let result = due_for_escalation(&dispute, anchor(), grace());
    assert!(matches!(
        result,
        Err(SkipReason::WithinGrace { remaining_secs: 3_600 })
    ));

    // Exactly 7 days: due.
    let dispute = make_dispute(Some(GRACE_DAYS));
    assert!(due_for_escalation(&dispute, anchor(), grace()).is_ok());
}

#[test]
fn prior_grant_always_wins() {
    let mut dispute = make_dispute(Some(400));
    dispute.provisional_editor = Some("u-reporter".to_string());
    let result = due_for_escalation(&dispute, anchor(), grace());
    assert_eq!(result.unwrap_err(), SkipReason::AlreadyGranted);
}

#[test]
fn missing_deadline_skips_without_escalating() {
    let dispute = make_dispute(None);
    let result = due_for_escalation(&dispute, anchor(), grace());
    assert_eq!(result.unwrap_err(), SkipReason::MissingDeadline);
}

// ── Product-side confirmation ────────────────────────────────────────────

#[test]
fn untouched_product_confirms_the_grant() {
    let dispute = make_dispute(Some(10));
    let pending = due_for_escalation(&dispute, anchor(), grace()).unwrap();
    let product = make_product(anchor() - Duration::days(20));

    let eligibility = confirm_grant(&pending, Some(&product));
    assert_eq!(
        eligibility,
        Eligibility::Escalate {
            editor: "u-reporter".to_string(),
            observed_modified: anchor() - Duration::days(20),
        }
    );
}

#[test]
fn edit_after_review_began_blocks_forever() {
    // Review started 10 days ago; the owner edited an hour later. Even
    // though the grace period has long passed, the grant must not fire.
    let dispute = make_dispute(Some(10));
    let pending = due_for_escalation(&dispute, anchor(), grace()).unwrap();
    let product = make_product(pending.pending_since + Duration::hours(1));

    assert_eq!(
        confirm_grant(&pending, Some(&product)),
        Eligibility::Skip(SkipReason::ProductUpdated)
    );
}

#[test]
fn edit_exactly_at_review_start_does_not_block() {
    // The block requires a strictly later edit.
    let dispute = make_dispute(Some(10));
    let pending = due_for_escalation(&dispute, anchor(), grace()).unwrap();
    let product = make_product(pending.pending_since);
    assert!(matches!(
        confirm_grant(&pending, Some(&product)),
        Eligibility::Escalate { .. }
    ));
}

#[test]
fn missing_product_skips() {
    let dispute = make_dispute(Some(10));
    let pending = due_for_escalation(&dispute, anchor(), grace()).unwrap();
    assert_eq!(
        confirm_grant(&pending, None),
        Eligibility::Skip(SkipReason::ProductMissing)
    );
}

#[test]
fn occupied_product_skips() {
    let dispute = make_dispute(Some(10));
    let pending = due_for_escalation(&dispute, anchor(), grace()).unwrap();
    let mut product = make_product(anchor() - Duration::days(20));
    product.provisional_editor = Some("u-other-reporter".to_string());
    assert_eq!(
        confirm_grant(&pending, Some(&product)),
        Eligibility::Skip(SkipReason::ProductOccupied)
    );
}

#[test]
fn evaluate_chains_both_halves() {
    let product = make_product(anchor() - Duration::days(20));

    let within = make_dispute(Some(2));
    assert!(matches!(
        evaluate(&within, Some(&product), anchor(), grace()),
        Eligibility::Skip(SkipReason::WithinGrace { .. })
    ));

    let overdue = make_dispute(Some(10));
    assert!(matches!(
        evaluate(&overdue, Some(&product), anchor(), grace()),
        Eligibility::Escalate { .. }
    ));
}

// ── Notification ─────────────────────────────────────────────────────────

#[test]
fn notice_is_bilingual_and_addressed_to_the_reporter() {
    let dispute = make_dispute(Some(10));
    let notice = provisional_edit_notice("Espresso Grinder", &dispute, "u-reporter");

    assert_eq!(notice.user_id, "u-reporter");
    assert_eq!(notice.kind, NotificationKind::ProvisionalEdit);
    assert_eq!(notice.product_sku, "espresso-grinder-01");
    assert_eq!(notice.dispute_id, "d-1");
    assert_eq!(notice.status, "Granted");

    let en = notice.message.resolve(Locale::En);
    assert!(en.contains("\"Espresso Grinder\""));
    assert!(en.contains("temporary edit access"));

    let es = notice.message.resolve(Locale::Es);
    assert!(es.contains("\"Espresso Grinder\""));
    assert!(es.contains("acceso de edición temporal"));
}
