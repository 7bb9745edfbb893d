//! Query modules, one per table family. Every timestamp read funnels
//! through the normalization helpers here so polymorphic stored values
//! (ISO text, epoch integers, epoch floats) all come back as instants.

pub mod dispute_ops;
pub mod lock_ops;
pub mod notification_ops;
pub mod product_ops;

use chrono::{DateTime, Utc};
use rusqlite::types::{Value, ValueRef};
use rusqlite::Row;
use vernier_core::errors::StoreError;
use vernier_core::instant::{self, RawTimestamp};

use crate::to_store_err;

pub(crate) fn malformed(record: &str, field: &str, details: impl Into<String>) -> StoreError {
    StoreError::MalformedField {
        record: record.to_string(),
        field: field.to_string(),
        details: details.into(),
    }
}

fn normalize_ref(value: ValueRef<'_>) -> Option<DateTime<Utc>> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(v) => instant::from_epoch_any(v),
        ValueRef::Real(v) => instant::to_instant(&RawTimestamp::EpochSeconds(v)),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .ok()
            .and_then(|s| instant::to_instant(&RawTimestamp::Iso8601(s.to_string()))),
        ValueRef::Blob(_) => None,
    }
}

/// Normalize an owned SQLite value; used where a raw cell was pulled out
/// of a `query_row` closure.
pub(crate) fn value_to_instant(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Null => None,
        Value::Integer(v) => instant::from_epoch_any(*v),
        Value::Real(v) => instant::to_instant(&RawTimestamp::EpochSeconds(*v)),
        Value::Text(s) => instant::to_instant(&RawTimestamp::Iso8601(s.clone())),
        Value::Blob(_) => None,
    }
}

/// Read a required timestamp column, whatever shape it was stored in.
pub(crate) fn instant_at(
    row: &Row<'_>,
    idx: usize,
    record: &str,
    field: &str,
) -> Result<DateTime<Utc>, StoreError> {
    match opt_instant_at(row, idx, record, field)? {
        Some(instant) => Ok(instant),
        None => Err(malformed(record, field, "unexpected NULL")),
    }
}

/// Read a nullable timestamp column. NULL is `None`; a present value that
/// does not normalize is a malformed-field error, never a panic.
pub(crate) fn opt_instant_at(
    row: &Row<'_>,
    idx: usize,
    record: &str,
    field: &str,
) -> Result<Option<DateTime<Utc>>, StoreError> {
    let value = row.get_ref(idx).map_err(|e| to_store_err(e.to_string()))?;
    if matches!(value, ValueRef::Null) {
        return Ok(None);
    }
    match normalize_ref(value) {
        Some(instant) => Ok(Some(instant)),
        None => Err(malformed(record, field, "unrecognized timestamp value")),
    }
}
