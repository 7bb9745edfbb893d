use chrono::{DateTime, Utc};
use vernier_core::instant::{elapsed_days, within_hours};
use vernier_core::Product;

/// Creation and last modification within this window count as one clean
/// submission.
const SAME_DAY_WINDOW_HOURS: i64 = 24;

const CAP: i64 = 10;

/// Age and stability term.
///
/// Formula (sub-scores summed, capped at 10):
/// - creation age, days since `created_at`: `≥365 → 4, ≥180 → 3, ≥90 → 2,
///   ≥30 → 1, else 0`;
/// - stability, days since `last_modified`: `≥90 → 3, ≥30 → 2, ≥7 → 1,
///   else 0`;
/// - `+3` when creation and last modification lie within 24 hours of each
///   other (a single clean submission; equal timestamps qualify).
///
/// Range: 0 – 10.
///
/// Listings that survive untouched earn trust. Future-dated timestamps
/// clamp to zero elapsed days rather than failing the record.
pub fn calculate(product: &Product, now: DateTime<Utc>) -> i64 {
    let mut score = 0;

    score += match elapsed_days(product.created_at, now) {
        d if d >= 365 => 4,
        d if d >= 180 => 3,
        d if d >= 90 => 2,
        d if d >= 30 => 1,
        _ => 0,
    };

    score += match elapsed_days(product.last_modified, now) {
        d if d >= 90 => 3,
        d if d >= 30 => 2,
        d if d >= 7 => 1,
        _ => 0,
    };

    if within_hours(product.created_at, product.last_modified, SAME_DAY_WINDOW_HOURS) {
        score += 3;
    }

    score.min(CAP)
}
