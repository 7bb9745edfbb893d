use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use vernier_core::{Confidence, Dispute, DisputeStatus, Product};
use vernier_escalation::eligibility::{due_for_escalation, evaluate, Eligibility, SkipReason};

fn anchor() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
}

fn make_dispute(pending_secs_ago: Option<i64>, granted: bool) -> Dispute {
    let now = anchor();
    Dispute {
        id: "d-prop".to_string(),
        product_sku: "prop-sku".to_string(),
        created_by: "u-reporter".to_string(),
        created_at: now - Duration::days(60),
        status: DisputeStatus::InReview,
        resolution_pending_at: pending_secs_ago.map(|s| now - Duration::seconds(s)),
        provisional_editor: granted.then(|| "u-someone".to_string()),
    }
}

fn make_product(modified_secs_before_now: i64, occupied: bool) -> Product {
    let now = anchor();
    Product {
        sku: "prop-sku".to_string(),
        name: "Prop Product".to_string(),
        likes: 0,
        views: 0,
        created_at: now - Duration::days(365),
        created_by: "u-owner".to_string(),
        last_modified: now - Duration::seconds(modified_secs_before_now),
        last_modified_by: None,
        provisional_editor: occupied.then(|| "u-occupant".to_string()),
        confidence: Confidence::BASELINE,
    }
}

proptest! {
    #[test]
    fn due_exactly_when_elapsed_reaches_grace(
        elapsed_secs in 0i64..100_000_000,
        grace_secs in 1i64..100_000_000,
    ) {
        let dispute = make_dispute(Some(elapsed_secs), false);
        let result = due_for_escalation(&dispute, anchor(), Duration::seconds(grace_secs));
        if elapsed_secs >= grace_secs {
            prop_assert!(result.is_ok());
        } else {
            prop_assert!(
                matches!(result, Err(SkipReason::WithinGrace { .. })),
                "expected Err(SkipReason::WithinGrace {{ .. }})"
            );
        }
    }

    #[test]
    fn a_prior_grant_blocks_any_elapsed_time(elapsed_secs in 0i64..1_000_000_000) {
        let dispute = make_dispute(Some(elapsed_secs), true);
        let result = due_for_escalation(&dispute, anchor(), Duration::seconds(60));
        prop_assert_eq!(result.unwrap_err(), SkipReason::AlreadyGranted);
    }

    #[test]
    fn remaining_secs_never_exceeds_the_grace_period(
        elapsed_secs in 0i64..604_800,
    ) {
        let grace = Duration::days(7);
        let dispute = make_dispute(Some(elapsed_secs), false);
        match due_for_escalation(&dispute, anchor(), grace) {
            Err(SkipReason::WithinGrace { remaining_secs }) => {
                prop_assert!(remaining_secs > 0);
                prop_assert!(remaining_secs <= grace.num_seconds());
            }
            Ok(_) => prop_assert_eq!(elapsed_secs, grace.num_seconds()),
            Err(other) => prop_assert!(false, "unexpected skip: {other:?}"),
        }
    }

    #[test]
    fn owner_activity_during_review_always_blocks(
        pending_secs_ago in 604_800i64..10_000_000,
        edit_lag_secs in 1i64..604_800,
    ) {
        // The product was edited `edit_lag_secs` after the review began.
        let dispute = make_dispute(Some(pending_secs_ago), false);
        let product = make_product(pending_secs_ago - edit_lag_secs, false);
        let result = evaluate(&dispute, Some(&product), anchor(), Duration::days(7));
        prop_assert_eq!(result, Eligibility::Skip(SkipReason::ProductUpdated));
    }

    #[test]
    fn evaluation_is_total(
        pending_secs_ago in proptest::option::of(-1_000_000i64..10_000_000),
        granted in any::<bool>(),
        product_present in any::<bool>(),
        modified_secs in -1_000_000i64..10_000_000,
        occupied in any::<bool>(),
        grace_secs in 0i64..10_000_000,
    ) {
        let dispute = make_dispute(pending_secs_ago, granted);
        let product = make_product(modified_secs, occupied);
        let maybe = product_present.then_some(&product);
        // Every input combination lands on a decision; nothing panics.
        let _ = evaluate(&dispute, maybe, anchor(), Duration::seconds(grace_secs));
    }
}
