use serde::{Deserialize, Serialize};

use super::defaults;

/// Settings for the confidence recalculation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// When false, `vernier watch` skips the scoring pass entirely.
    pub enabled: bool,
    /// Seconds between scoring passes in watch mode.
    pub interval_secs: u64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: defaults::SCORING_INTERVAL_SECS,
        }
    }
}
