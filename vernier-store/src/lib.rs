//! # vernier-store
//!
//! SQLite adapter for the shared store. A single write connection behind a
//! mutex plus a small round-robin read pool (WAL keeps readers unblocked),
//! numbered migrations gated on `user_version`, and query modules that
//! normalize every timestamp they read. [`StorageEngine`] implements the
//! storage traits the engines consume.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StorageEngine;

use vernier_core::errors::StoreError;

/// Wrap a raw SQLite error message into the store error family.
pub fn to_store_err(message: impl Into<String>) -> StoreError {
    StoreError::Sqlite {
        message: message.into(),
    }
}
