use proptest::prelude::*;
use vernier_core::instant::{from_epoch_any, to_instant, RawTimestamp};
use vernier_core::models::{Confidence, DisputeStatus, DisputeTally};

proptest! {
    #[test]
    fn confidence_always_lands_in_range(raw in any::<i64>()) {
        let c = Confidence::new(raw);
        prop_assert!(c >= Confidence::MIN);
        prop_assert!(c <= Confidence::MAX);
    }

    #[test]
    fn confidence_is_identity_inside_range(raw in 0i64..=100) {
        prop_assert_eq!(Confidence::new(raw).value() as i64, raw);
    }

    #[test]
    fn epoch_heuristic_never_panics(raw in any::<i64>()) {
        // Extreme values may be unrepresentable (None); they must not panic.
        let _ = from_epoch_any(raw);
    }

    #[test]
    fn iso_parser_never_panics_on_arbitrary_text(text in "\\PC{0,40}") {
        let _ = to_instant(&RawTimestamp::Iso8601(text));
    }

    #[test]
    fn tally_total_matches_inserted_count(statuses in prop::collection::vec(0u8..4, 0..50)) {
        let statuses: Vec<DisputeStatus> = statuses
            .into_iter()
            .map(|n| match n {
                0 => DisputeStatus::Open,
                1 => DisputeStatus::InReview,
                2 => DisputeStatus::Resolved,
                _ => DisputeStatus::Rejected,
            })
            .collect();
        let expected = statuses.len() as u32;
        let tally: DisputeTally = statuses.into_iter().collect();
        prop_assert_eq!(tally.total(), expected);
    }
}
