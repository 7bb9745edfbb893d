//! # vernier-escalation
//!
//! Escalates disputes that sat in review past their grace period into
//! one-time provisional edit grants. The eligibility checks are pure
//! functions over the dispute and product rows; the actual grant is a
//! compare-and-swap committed by the store, so a concurrent moderator
//! decision or product edit always wins over the batch.

pub mod eligibility;
pub mod engine;
pub mod notification;

pub use eligibility::{Eligibility, PendingEscalation, SkipReason};
pub use engine::EscalationEngine;
