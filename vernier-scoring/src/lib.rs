//! # vernier-scoring
//!
//! The confidence recalculation pass. Five additive terms over community
//! engagement signals are summed onto a fixed baseline and clamped to
//! [0, 100]; the [`engine::ScoringEngine`] applies the formula across the
//! whole catalog and writes back only the scores that changed.

pub mod engine;
pub mod formula;
pub mod terms;

pub use engine::ScoringEngine;
pub use formula::{compute, compute_breakdown, ScoreBreakdown};
pub use terms::ScoreContext;
