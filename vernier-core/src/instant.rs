//! Timestamp normalization applied at every read boundary.
//!
//! The shared store and historical JSON dumps carry the same logical field
//! in three shapes: ISO-8601 text, epoch numbers (seconds or milliseconds),
//! and store-native `{seconds, nanoseconds}` objects. Everything funnels
//! through [`to_instant`] so the rest of the engine only ever sees
//! `DateTime<Utc>`.

use chrono::{DateTime, NaiveDateTime, Utc};

/// A timestamp as read from storage, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawTimestamp {
    Iso8601(String),
    EpochMillis(i64),
    EpochSeconds(f64),
}

/// Epoch values at or above this are interpreted as milliseconds.
/// 10^11 seconds is year 5138; 10^11 milliseconds is March 1973.
const MILLIS_CUTOFF: i64 = 100_000_000_000;

/// Normalize a raw timestamp to a UTC instant.
///
/// Returns `None` when the value cannot be interpreted; callers raise a
/// malformed-field error with the record context rather than panicking.
/// Text that is itself a bare number (a TEXT column that swallowed an
/// epoch write) falls back to the epoch heuristic.
pub fn to_instant(raw: &RawTimestamp) -> Option<DateTime<Utc>> {
    match raw {
        RawTimestamp::Iso8601(text) => parse_iso(text),
        RawTimestamp::EpochMillis(ms) => DateTime::from_timestamp_millis(*ms),
        RawTimestamp::EpochSeconds(secs) => {
            if !secs.is_finite() {
                return None;
            }
            DateTime::from_timestamp_millis((secs * 1000.0).round() as i64)
        }
    }
}

/// Interpret a bare epoch integer: milliseconds at or above the cutoff,
/// seconds below it.
pub fn from_epoch_any(value: i64) -> Option<DateTime<Utc>> {
    if value.abs() >= MILLIS_CUTOFF {
        DateTime::from_timestamp_millis(value)
    } else {
        DateTime::from_timestamp(value, 0)
    }
}

fn parse_iso(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    // SQLite's CURRENT_TIMESTAMP format and its T-separated variant carry
    // no offset; both are UTC by convention.
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(int) = text.parse::<i64>() {
        return from_epoch_any(int);
    }
    if let Ok(float) = text.parse::<f64>() {
        return to_instant(&RawTimestamp::EpochSeconds(float));
    }
    None
}

/// Whole days elapsed from `from` to `now`, clamped at zero so future
/// timestamps (clock skew, bad imports) read as "just now".
pub fn elapsed_days(from: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - from).num_seconds().max(0) / 86_400
}

/// True when the two instants lie within `hours` of each other,
/// in either direction.
pub fn within_hours(a: DateTime<Utc>, b: DateTime<Utc>, hours: i64) -> bool {
    (a - b).num_seconds().abs() < hours * 3_600
}

/// Serde adapter for `DateTime<Utc>` fields that must accept all stored
/// timestamp shapes. Serialization always emits RFC 3339.
pub mod flexible {
    use super::*;
    use serde::de::Error as DeError;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    pub(super) enum Wire {
        Int(i64),
        Float(f64),
        Text(String),
        Native {
            seconds: i64,
            #[serde(default)]
            nanoseconds: u32,
        },
    }

    pub(super) fn wire_to_instant(wire: &Wire) -> Option<DateTime<Utc>> {
        match wire {
            Wire::Int(v) => from_epoch_any(*v),
            Wire::Float(v) => to_instant(&RawTimestamp::EpochSeconds(*v)),
            Wire::Text(s) => to_instant(&RawTimestamp::Iso8601(s.clone())),
            Wire::Native {
                seconds,
                nanoseconds,
            } => DateTime::from_timestamp(*seconds, *nanoseconds),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = Wire::deserialize(deserializer)?;
        wire_to_instant(&wire).ok_or_else(|| DeError::custom("unrecognized timestamp value"))
    }

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339())
    }
}

/// Serde adapter for optional timestamp fields; `null`/absent stay `None`.
pub mod flexible_opt {
    use super::flexible::{wire_to_instant, Wire};
    use super::*;
    use serde::de::Error as DeError;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = Option::<Wire>::deserialize(deserializer)?;
        match wire {
            None => Ok(None),
            Some(w) => wire_to_instant(&w)
                .map(Some)
                .ok_or_else(|| DeError::custom("unrecognized timestamp value")),
        }
    }

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }
}
