use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use vernier_core::{Confidence, DisputeTally, Product};
use vernier_scoring::{compute, terms, ScoreContext};

fn anchor() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
}

fn make_product(
    likes: u64,
    views: u64,
    created_days_ago: i64,
    modified_days_ago: i64,
    distinct_editor: bool,
) -> Product {
    let now = anchor();
    Product {
        sku: "prop-sku".to_string(),
        name: "Prop Product".to_string(),
        likes,
        views,
        created_at: now - Duration::days(created_days_ago),
        created_by: "u-creator".to_string(),
        last_modified: now - Duration::days(modified_days_ago),
        last_modified_by: if distinct_editor {
            Some("u-editor".to_string())
        } else {
            None
        },
        provisional_editor: None,
        confidence: Confidence::BASELINE,
    }
}

proptest! {
    #[test]
    fn score_always_lands_in_range(
        likes in 0u64..100_000,
        views in 0u64..1_000_000,
        created_days_ago in -400i64..4_000,
        modified_days_ago in -400i64..4_000,
        distinct_editor in any::<bool>(),
        open in 0u32..200,
        resolved in 0u32..200,
        rejected in 0u32..200,
        in_review in 0u32..200,
    ) {
        let product = make_product(likes, views, created_days_ago, modified_days_ago, distinct_editor);
        let tally = DisputeTally { open, resolved, rejected, in_review };
        let score = compute(&product, &tally, &ScoreContext::new(anchor()));
        prop_assert!(score >= Confidence::MIN);
        prop_assert!(score <= Confidence::MAX);
    }

    #[test]
    fn likes_term_is_monotone(base in 0u64..5_000, extra in 0u64..5_000) {
        let lower = make_product(base, 0, 0, 0, false);
        let higher = make_product(base + extra, 0, 0, 0, false);
        prop_assert!(
            terms::likes::calculate(&lower) <= terms::likes::calculate(&higher)
        );
    }

    #[test]
    fn views_term_is_monotone(base in 0u64..50_000, extra in 0u64..50_000) {
        let lower = make_product(0, base, 0, 0, false);
        let higher = make_product(0, base + extra, 0, 0, false);
        prop_assert!(
            terms::views::calculate(&lower) <= terms::views::calculate(&higher)
        );
    }

    #[test]
    fn dispute_term_stays_clamped(
        open in 0u32..10_000,
        resolved in 0u32..10_000,
        rejected in 0u32..10_000,
    ) {
        let tally = DisputeTally { open, resolved, rejected, in_review: 0 };
        let term = terms::disputes::calculate(&tally);
        prop_assert!((-15..=5).contains(&term));
    }

    #[test]
    fn scoring_is_deterministic(
        likes in 0u64..10_000,
        views in 0u64..10_000,
        created_days_ago in 0i64..2_000,
        modified_days_ago in 0i64..2_000,
        distinct_editor in any::<bool>(),
    ) {
        let product = make_product(likes, views, created_days_ago, modified_days_ago, distinct_editor);
        let tally = DisputeTally::default();
        let ctx = ScoreContext::new(anchor());
        prop_assert_eq!(compute(&product, &tally, &ctx), compute(&product, &tally, &ctx));
    }

    #[test]
    fn age_term_never_exceeds_its_cap(
        created_days_ago in -1_000i64..10_000,
        modified_days_ago in -1_000i64..10_000,
    ) {
        let product = make_product(0, 0, created_days_ago, modified_days_ago, false);
        let term = terms::age::calculate(&product, anchor());
        prop_assert!((0..=10).contains(&term));
    }
}
