use vernier_core::{Confidence, DisputeTally, Product};

use crate::terms::{self, ScoreContext};

/// 5-term additive confidence formula.
///
/// ```text
/// confidence = 85 (baseline)
///   + likes      (0..=10)
///   + views      (0..=5)
///   + edits      (0..=10)
///   + disputes   (-15..=5)
///   + age        (0..=10)
/// ```
///
/// Result is clamped to [0, 100]. Integer arithmetic throughout; the same
/// inputs always produce the same score.
pub fn compute(product: &Product, tally: &DisputeTally, ctx: &ScoreContext) -> Confidence {
    let baseline = Confidence::BASELINE.value() as i64;

    let likes = terms::likes::calculate(product);
    let views = terms::views::calculate(product);
    let edits = terms::edits::calculate(product, ctx.now);
    let disputes = terms::disputes::calculate(tally);
    let age = terms::age::calculate(product, ctx.now);

    Confidence::new(baseline + likes + views + edits + disputes + age)
}

/// Every term computed individually for debugging/observability.
#[derive(Debug, Clone)]
pub struct ScoreBreakdown {
    pub baseline: i64,
    pub likes: i64,
    pub views: i64,
    pub edits: i64,
    pub disputes: i64,
    pub age: i64,
    /// Unclamped sum of baseline and terms.
    pub total: i64,
    pub confidence: Confidence,
}

/// Compute the score with a full breakdown of each term.
pub fn compute_breakdown(
    product: &Product,
    tally: &DisputeTally,
    ctx: &ScoreContext,
) -> ScoreBreakdown {
    let baseline = Confidence::BASELINE.value() as i64;

    let likes = terms::likes::calculate(product);
    let views = terms::views::calculate(product);
    let edits = terms::edits::calculate(product, ctx.now);
    let disputes = terms::disputes::calculate(tally);
    let age = terms::age::calculate(product, ctx.now);

    let total = baseline + likes + views + edits + disputes + age;

    ScoreBreakdown {
        baseline,
        likes,
        views,
        edits,
        disputes,
        age,
        total,
        confidence: Confidence::new(total),
    }
}
