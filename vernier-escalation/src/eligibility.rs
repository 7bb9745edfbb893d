//! The time-gated eligibility state machine, split in two halves: the
//! dispute-side checks that need no product read, and the product-side
//! confirmation against the freshly loaded row.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use vernier_core::{Dispute, Product};

/// A dispute that cleared the dispute-side checks and is waiting on
/// product-side confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEscalation {
    pub dispute_id: String,
    pub product_sku: String,
    /// The reporter who will receive the grant.
    pub editor: String,
    /// When the review clock started.
    pub pending_since: DateTime<Utc>,
}

/// Why a dispute was not escalated this sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The dispute already produced a grant; grants are one-time.
    AlreadyGranted,
    /// No review deadline stamped. The sweep query filters these out;
    /// this guards direct callers.
    MissingDeadline,
    /// The review clock has not run out yet.
    WithinGrace { remaining_secs: i64 },
    /// The disputed product no longer exists.
    ProductMissing,
    /// The product was edited after the review began; the owner acted.
    ProductUpdated,
    /// Another dispute already holds the product's provisional slot.
    ProductOccupied,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::AlreadyGranted => f.write_str("already granted"),
            SkipReason::MissingDeadline => f.write_str("no review deadline"),
            SkipReason::WithinGrace { remaining_secs } => {
                write!(f, "within grace ({remaining_secs}s remaining)")
            }
            SkipReason::ProductMissing => f.write_str("product missing"),
            SkipReason::ProductUpdated => f.write_str("product updated during review"),
            SkipReason::ProductOccupied => f.write_str("product occupied by another grant"),
        }
    }
}

/// Outcome of the full eligibility evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eligibility {
    Escalate {
        editor: String,
        /// The product `last_modified` to re-check inside the grant
        /// transaction.
        observed_modified: DateTime<Utc>,
    },
    Skip(SkipReason),
}

/// Dispute-side checks, in order: a prior grant wins, then the review
/// deadline must exist, then the grace period gates everything else.
///
/// A dispute whose elapsed review time equals the grace period exactly is
/// due; `WithinGrace` requires strictly less.
pub fn due_for_escalation(
    dispute: &Dispute,
    now: DateTime<Utc>,
    grace: Duration,
) -> Result<PendingEscalation, SkipReason> {
    if dispute.provisional_editor.is_some() {
        return Err(SkipReason::AlreadyGranted);
    }

    let Some(pending_since) = dispute.resolution_pending_at else {
        return Err(SkipReason::MissingDeadline);
    };

    let elapsed = now - pending_since;
    if elapsed < grace {
        return Err(SkipReason::WithinGrace {
            remaining_secs: (grace - elapsed).num_seconds(),
        });
    }

    Ok(PendingEscalation {
        dispute_id: dispute.id.clone(),
        product_sku: dispute.product_sku.clone(),
        editor: dispute.created_by.clone(),
        pending_since,
    })
}

/// Product-side confirmation against the freshly loaded row.
///
/// An edit strictly after the review began means the owner already acted
/// on the dispute, so the grant must never fire no matter how overdue the
/// review is.
pub fn confirm_grant(pending: &PendingEscalation, product: Option<&Product>) -> Eligibility {
    let Some(product) = product else {
        return Eligibility::Skip(SkipReason::ProductMissing);
    };

    if product.last_modified > pending.pending_since {
        return Eligibility::Skip(SkipReason::ProductUpdated);
    }

    if product.provisional_editor.is_some() {
        return Eligibility::Skip(SkipReason::ProductOccupied);
    }

    Eligibility::Escalate {
        editor: pending.editor.clone(),
        observed_modified: product.last_modified,
    }
}

/// Both halves chained, for tests and direct callers.
pub fn evaluate(
    dispute: &Dispute,
    product: Option<&Product>,
    now: DateTime<Utc>,
    grace: Duration,
) -> Eligibility {
    match due_for_escalation(dispute, now, grace) {
        Ok(pending) => confirm_grant(&pending, product),
        Err(reason) => Eligibility::Skip(reason),
    }
}
