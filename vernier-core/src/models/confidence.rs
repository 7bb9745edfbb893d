use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Community confidence in a product listing, always in `[0, 100]`.
///
/// The value is derived by the scoring pass and never hand-edited. A record
/// that has not been scored yet carries [`Confidence::BASELINE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Confidence(u8);

impl Confidence {
    pub const MIN: Confidence = Confidence(0);
    pub const MAX: Confidence = Confidence(100);
    /// The neutral starting score every formula run builds on.
    pub const BASELINE: Confidence = Confidence(85);

    /// Clamp an arbitrary signed total into range.
    pub fn new(value: i64) -> Self {
        Self(value.clamp(0, 100) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self::BASELINE
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Confidence {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

// Deserialization clamps rather than trusting stored integers, so an
// out-of-range value in an old dump cannot smuggle in an invalid score.
impl<'de> Deserialize<'de> for Confidence {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = i64::deserialize(deserializer)?;
        Ok(Confidence::new(raw))
    }
}
