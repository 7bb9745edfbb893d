use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::instant;

/// A community dispute against a product listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dispute {
    pub id: String,
    /// Reference to the disputed product; disputes never own products.
    pub product_sku: String,
    /// The reporter, and the recipient of a provisional grant.
    pub created_by: String,
    #[serde(with = "instant::flexible")]
    pub created_at: DateTime<Utc>,
    pub status: DisputeStatus,
    /// Stamped by the webapp when a moderator moves the dispute to review.
    #[serde(default, with = "instant::flexible_opt")]
    pub resolution_pending_at: Option<DateTime<Utc>>,
    /// Mirror of the product's grant field, written in the same transaction.
    #[serde(default)]
    pub provisional_editor: Option<String>,
}

/// Lifecycle state of a dispute. `Resolved` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisputeStatus {
    Open,
    InReview,
    Resolved,
    Rejected,
}

impl DisputeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DisputeStatus::Open => "open",
            DisputeStatus::InReview => "in_review",
            DisputeStatus::Resolved => "resolved",
            DisputeStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, DisputeStatus::Resolved | DisputeStatus::Rejected)
    }
}

impl fmt::Display for DisputeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisputeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(DisputeStatus::Open),
            "in_review" => Ok(DisputeStatus::InReview),
            "resolved" => Ok(DisputeStatus::Resolved),
            "rejected" => Ok(DisputeStatus::Rejected),
            other => Err(format!("unknown dispute status {other:?}")),
        }
    }
}

/// Per-product dispute counts, one row of the store's GROUP BY pass.
///
/// A product with no disputes simply has no tally; `Default` (all zero)
/// scores identically.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisputeTally {
    pub open: u32,
    pub in_review: u32,
    pub resolved: u32,
    pub rejected: u32,
}

impl DisputeTally {
    pub fn record(&mut self, status: DisputeStatus) {
        match status {
            DisputeStatus::Open => self.open += 1,
            DisputeStatus::InReview => self.in_review += 1,
            DisputeStatus::Resolved => self.resolved += 1,
            DisputeStatus::Rejected => self.rejected += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.open + self.in_review + self.resolved + self.rejected
    }
}

impl FromIterator<DisputeStatus> for DisputeTally {
    fn from_iter<I: IntoIterator<Item = DisputeStatus>>(iter: I) -> Self {
        let mut tally = DisputeTally::default();
        for status in iter {
            tally.record(status);
        }
        tally
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            DisputeStatus::Open,
            DisputeStatus::InReview,
            DisputeStatus::Resolved,
            DisputeStatus::Rejected,
        ] {
            assert_eq!(status.as_str().parse::<DisputeStatus>().unwrap(), status);
        }
        assert!("escalated".parse::<DisputeStatus>().is_err());
    }

    #[test]
    fn terminal_states() {
        assert!(DisputeStatus::Resolved.is_terminal());
        assert!(DisputeStatus::Rejected.is_terminal());
        assert!(!DisputeStatus::Open.is_terminal());
        assert!(!DisputeStatus::InReview.is_terminal());
    }

    #[test]
    fn tally_collects_statuses() {
        let tally: DisputeTally = [
            DisputeStatus::Open,
            DisputeStatus::Open,
            DisputeStatus::Rejected,
            DisputeStatus::InReview,
        ]
        .into_iter()
        .collect();
        assert_eq!(tally.open, 2);
        assert_eq!(tally.rejected, 1);
        assert_eq!(tally.in_review, 1);
        assert_eq!(tally.resolved, 0);
        assert_eq!(tally.total(), 4);
    }

    #[test]
    fn dispute_accepts_epoch_pending_timestamp() {
        let json = r#"{
            "id": "d-1",
            "productSku": "s",
            "createdBy": "u-reporter",
            "createdAt": "2024-03-01T10:00:00Z",
            "status": "in_review",
            "resolutionPendingAt": {"seconds": 1709287200, "nanoseconds": 0}
        }"#;
        let d: Dispute = serde_json::from_str(json).unwrap();
        assert_eq!(d.status, DisputeStatus::InReview);
        assert_eq!(
            d.resolution_pending_at.unwrap().to_rfc3339(),
            "2024-03-01T10:00:00+00:00"
        );
    }
}
