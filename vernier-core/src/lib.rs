//! # vernier-core
//!
//! Foundation crate for the vernier maintenance engine.
//! Defines the product/dispute/notification models, the confidence score
//! newtype, timestamp normalization, errors, config, storage traits, and
//! run control. Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod control;
pub mod errors;
pub mod instant;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::VernierConfig;
pub use control::RunControl;
pub use errors::{VernierError, VernierResult};
pub use models::{
    Confidence, Dispute, DisputeStatus, DisputeTally, Locale, LocalizedText, NewNotification,
    Notification, NotificationKind, Product,
};
