use vernier_core::DisputeTally;

const OPEN_WEIGHT: i64 = -3;
const RESOLVED_WEIGHT: i64 = -2;
const REJECTED_WEIGHT: i64 = 1;

const MIN: i64 = -15;
const MAX: i64 = 5;

/// Dispute standing term.
///
/// Formula: `−3·open − 2·resolved + 1·rejected`, clamped to [−15, +5].
/// Range: −15 – +5.
///
/// Open disputes are active doubt; resolved ones confirm the listing was
/// wrong and needed fixing; rejected ones mean scrutiny found nothing.
/// Disputes sitting in review carry no weight until a moderator decides.
pub fn calculate(tally: &DisputeTally) -> i64 {
    let raw = OPEN_WEIGHT * tally.open as i64
        + RESOLVED_WEIGHT * tally.resolved as i64
        + REJECTED_WEIGHT * tally.rejected as i64;
    raw.clamp(MIN, MAX)
}
