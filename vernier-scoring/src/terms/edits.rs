use chrono::{DateTime, Utc};
use vernier_core::instant::elapsed_days;
use vernier_core::Product;

/// Edits within this many days of `now` count as recent (inclusive bound).
const RECENT_EDIT_WINDOW_DAYS: i64 = 30;

/// The three sub-scores sum to at most this.
const CAP: i64 = 10;

/// Edit history term.
///
/// Formula (sub-scores summed, capped at 10):
/// - `+5` when `last_modified_by` is present and differs from the creator;
/// - `+2` when `last_modified` strictly postdates `created_at` (equal
///   timestamps mean the listing was never edited);
/// - `+3` when an edit occurred and the latest one is within 30 days of
///   `now` (inclusive).
///
/// Range: 0 – 10.
///
/// A second pair of eyes is the strongest maintenance signal. A brand-new
/// untouched product carries no `last_modified_by` and equal timestamps,
/// so it scores 0 here.
pub fn calculate(product: &Product, now: DateTime<Utc>) -> i64 {
    let mut score = 0;

    if product
        .last_modified_by
        .as_deref()
        .is_some_and(|editor| editor != product.created_by)
    {
        score += 5;
    }

    if product.was_edited() {
        score += 2;
        if elapsed_days(product.last_modified, now) <= RECENT_EDIT_WINDOW_DAYS {
            score += 3;
        }
    }

    score.min(CAP)
}
