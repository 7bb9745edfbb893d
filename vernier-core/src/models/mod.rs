//! Domain models shared by every vernier crate.

mod confidence;
mod dispute;
mod notification;
mod product;
pub mod reports;

pub use confidence::Confidence;
pub use dispute::{Dispute, DisputeStatus, DisputeTally};
pub use notification::{Locale, LocalizedText, NewNotification, Notification, NotificationKind};
pub use product::Product;
pub use reports::{
    ConfidenceDelta, EscalationOutcome, EscalationReport, ScoringReport, SkipCounts,
};
