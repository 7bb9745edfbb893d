use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::defaults;

/// Settings for the provisional edit escalation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EscalationConfig {
    /// When false, `vernier watch` skips the escalation pass entirely.
    pub enabled: bool,
    /// Seconds between escalation sweeps in watch mode.
    pub interval_secs: u64,
    /// Seconds a dispute must sit in review before it escalates.
    pub grace_period_secs: u64,
}

impl EscalationConfig {
    /// Grace period as a chrono duration for instant arithmetic.
    pub fn grace_period(&self) -> Duration {
        Duration::seconds(self.grace_period_secs as i64)
    }
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: defaults::ESCALATION_INTERVAL_SECS,
            grace_period_secs: defaults::GRACE_PERIOD_SECS,
        }
    }
}
