//! Layered configuration: defaults, then an optional TOML file, then
//! environment overrides. Every field has a default so a missing or
//! partial file is never an error.

pub mod defaults;

mod escalation_config;
mod scoring_config;
mod store_config;

pub use escalation_config::EscalationConfig;
pub use scoring_config::ScoringConfig;
pub use store_config::StoreConfig;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Environment variable naming a config file to load when no `--config`
/// flag is given.
pub const ENV_CONFIG: &str = "VERNIER_CONFIG";
/// Environment override for the database path.
pub const ENV_DB_PATH: &str = "VERNIER_DB_PATH";
/// Environment override for the escalation grace period, in seconds.
pub const ENV_GRACE_PERIOD_SECS: &str = "VERNIER_GRACE_PERIOD_SECS";

/// Root configuration for all vernier components.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VernierConfig {
    pub store: StoreConfig,
    pub scoring: ScoringConfig,
    pub escalation: EscalationConfig,
}

impl VernierConfig {
    /// Load a TOML config file. Missing keys fall back to defaults;
    /// an unreadable or malformed file is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        toml::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Resolve the effective configuration: explicit path if given, else
    /// the file named by `VERNIER_CONFIG`, else defaults; then apply
    /// environment overrides on top.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::load(p)?,
            None => match std::env::var(ENV_CONFIG) {
                Ok(p) => Self::load(&PathBuf::from(p))?,
                Err(_) => Self::default(),
            },
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply single-value environment overrides on top of whatever the
    /// file (or defaults) provided.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(path) = std::env::var(ENV_DB_PATH) {
            self.store.db_path = PathBuf::from(path);
        }
        if let Ok(raw) = std::env::var(ENV_GRACE_PERIOD_SECS) {
            let secs: u64 = raw.parse().map_err(|_| ConfigError::BadOverride {
                name: ENV_GRACE_PERIOD_SECS.to_string(),
                reason: format!("expected a non-negative integer, got {raw:?}"),
            })?;
            self.escalation.grace_period_secs = secs;
        }
        Ok(())
    }
}
