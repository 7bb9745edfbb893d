//! One module per scoring term. Every term is a pure function of the
//! product row (and dispute tally) against a fixed evaluation instant.

pub mod age;
pub mod disputes;
pub mod edits;
pub mod likes;
pub mod views;

use chrono::{DateTime, Utc};

/// Evaluation context shared by every product in one scoring pass.
///
/// Capturing `now` once per pass keeps the run deterministic: two products
/// with identical signals always score identically within a run.
#[derive(Debug, Clone, Copy)]
pub struct ScoreContext {
    pub now: DateTime<Utc>,
}

impl ScoreContext {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

impl Default for ScoreContext {
    fn default() -> Self {
        Self { now: Utc::now() }
    }
}
