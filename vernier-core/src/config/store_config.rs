use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Storage settings shared by every component.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path to the SQLite database file.
    pub db_path: PathBuf,
    /// Seconds before a stale run lock may be taken over by another holder.
    pub run_lock_ttl_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(defaults::DB_PATH),
            run_lock_ttl_secs: defaults::RUN_LOCK_TTL_SECS,
        }
    }
}
