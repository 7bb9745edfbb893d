use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};

use crate::errors::StoreError;
use crate::models::{
    Confidence, Dispute, DisputeTally, NewNotification, Notification, Product,
};

/// Read/write surface for product listings.
///
/// Writes are field-scoped on purpose: the scoring pass may only touch
/// `confidence`, never the rest of the row, so it can run concurrently
/// with webapp edits without clobbering them.
pub trait ProductStore: Send + Sync {
    fn list_products(&self) -> Result<Vec<Product>, StoreError>;

    /// `None` when the sku does not exist; absence is not an error.
    fn get_product(&self, sku: &str) -> Result<Option<Product>, StoreError>;

    /// Update only the confidence column of one product.
    fn set_confidence(&self, sku: &str, confidence: Confidence) -> Result<(), StoreError>;

    /// Full-row write used by the importer and the webapp surface.
    fn upsert_product(&self, product: &Product) -> Result<(), StoreError>;
}

/// Read/write surface for disputes.
pub trait DisputeStore: Send + Sync {
    /// Disputes with status `in_review` and a review deadline stamped.
    /// The escalation sweep's working set.
    fn pending_review(&self) -> Result<Vec<Dispute>, StoreError>;

    /// Status counts per product sku in one grouped pass; products with
    /// no disputes are absent from the map.
    fn dispute_tallies(&self) -> Result<HashMap<String, DisputeTally>, StoreError>;

    fn get_dispute(&self, id: &str) -> Result<Option<Dispute>, StoreError>;

    fn upsert_dispute(&self, dispute: &Dispute) -> Result<(), StoreError>;

    /// Atomically grant a provisional edit, or report why the grant lost.
    ///
    /// The adapter re-reads the dispute and product inside one write
    /// transaction, verifies nothing moved since the engine observed them,
    /// then writes the dispute's grant field, the product's grant field,
    /// and the notification row together. Any failed check rolls the
    /// whole transaction back.
    fn grant_provisional_edit(&self, grant: &ProvisionalGrant)
        -> Result<GrantOutcome, StoreError>;
}

/// Outbound notification surface.
pub trait NotificationSink: Send + Sync {
    /// Insert a notification; the store assigns `id` and `created_at`.
    fn push(&self, notification: NewNotification) -> Result<Notification, StoreError>;

    /// Newest-first feed for one user; the downstream UI read path.
    fn notifications_for(&self, user_id: &str) -> Result<Vec<Notification>, StoreError>;
}

/// Everything the store needs to commit one provisional grant.
#[derive(Debug, Clone)]
pub struct ProvisionalGrant {
    pub dispute_id: String,
    pub product_sku: String,
    /// The dispute reporter receiving edit access.
    pub editor: String,
    /// The product `last_modified` the engine saw when it decided to
    /// escalate; the transaction re-checks it before committing.
    pub observed_modified: DateTime<Utc>,
    pub notification: NewNotification,
}

/// Result of the grant transaction's re-checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantOutcome {
    Granted,
    /// The dispute's grant field was filled by a concurrent run.
    DisputeAlreadyGranted,
    /// The product's `last_modified` no longer matches what the engine
    /// observed, or the product row disappeared.
    ProductChanged,
    /// Another dispute already holds the product's provisional slot.
    ProductOccupied,
}

impl GrantOutcome {
    pub fn is_granted(self) -> bool {
        matches!(self, GrantOutcome::Granted)
    }
}

impl fmt::Display for GrantOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GrantOutcome::Granted => "granted",
            GrantOutcome::DisputeAlreadyGranted => "dispute already granted",
            GrantOutcome::ProductChanged => "product changed",
            GrantOutcome::ProductOccupied => "product occupied",
        };
        f.write_str(label)
    }
}
