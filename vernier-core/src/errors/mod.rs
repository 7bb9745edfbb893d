//! Error types for the vernier engine, grouped per subsystem.

mod config_error;
mod store_error;

pub use config_error::ConfigError;
pub use store_error::StoreError;

/// Top-level error type. Subsystem errors convert into this via `#[from]`
/// so `?` works across crate boundaries.
#[derive(Debug, thiserror::Error)]
pub enum VernierError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A batch engine refused to start because a run is already active
    /// in this process.
    #[error("{component} run already in progress")]
    RunInProgress { component: &'static str },
}

/// Result alias used across the workspace.
pub type VernierResult<T> = std::result::Result<T, VernierError>;
