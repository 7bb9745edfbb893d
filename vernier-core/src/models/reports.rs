//! Operator-visible outcome of a batch pass. Reports serialize to JSON for
//! the CLI's `--json` mode and feed the structured batch-summary logs.

use serde::{Deserialize, Serialize};

use super::Confidence;

/// One confidence change applied by a scoring pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceDelta {
    pub sku: String,
    pub previous: Confidence,
    pub updated: Confidence,
}

/// Summary of one scoring pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringReport {
    pub scanned: u64,
    pub updated: u64,
    pub unchanged: u64,
    pub errored: u64,
    pub deltas: Vec<ConfidenceDelta>,
    /// True when the pass stopped early on cancellation or deadline.
    pub partial: bool,
    pub duration_ms: u64,
}

/// Why eligible-looking disputes were not escalated, by category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkipCounts {
    pub already_granted: u64,
    pub missing_deadline: u64,
    pub within_grace: u64,
    pub product_missing: u64,
    pub product_updated: u64,
    pub product_occupied: u64,
}

impl SkipCounts {
    pub fn total(&self) -> u64 {
        self.already_granted
            + self.missing_deadline
            + self.within_grace
            + self.product_missing
            + self.product_updated
            + self.product_occupied
    }
}

/// Audit line for one dispute considered by an escalation sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EscalationOutcome {
    pub dispute_id: String,
    pub product_sku: String,
    pub outcome: String,
}

/// Summary of one escalation sweep.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EscalationReport {
    pub scanned: u64,
    pub granted: u64,
    pub skipped: SkipCounts,
    /// Grants that failed their in-transaction re-check because a
    /// concurrent writer got there first.
    pub race_lost: u64,
    pub errored: u64,
    pub outcomes: Vec<EscalationOutcome>,
    pub partial: bool,
    pub duration_ms: u64,
}
