use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Confidence;
use crate::instant;

/// A community-maintained product listing.
///
/// Field names follow the webapp's camelCase wire contract; the timestamp
/// fields accept every representation historical dumps contain and always
/// serialize as RFC 3339.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Stable unique slug assigned at creation.
    pub sku: String,
    /// Display name, interpolated into grant notifications.
    pub name: String,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub views: u64,
    #[serde(with = "instant::flexible")]
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    #[serde(with = "instant::flexible")]
    pub last_modified: DateTime<Utc>,
    /// Absent on listings nobody touched since creation.
    #[serde(default)]
    pub last_modified_by: Option<String>,
    /// Set at most once per dispute escalation; `None` means not escalated.
    #[serde(default)]
    pub provisional_editor: Option<String>,
    #[serde(default)]
    pub confidence: Confidence,
}

impl Product {
    /// True once any write postdates creation. Equal timestamps mean the
    /// listing was never edited.
    pub fn was_edited(&self) -> bool {
        self.last_modified > self.created_at
    }
}
