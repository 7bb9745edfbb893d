/// Configuration loading and validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("invalid config file {path}: {reason}")]
    Parse { path: String, reason: String },

    /// An environment override carried a value that does not parse.
    #[error("invalid value for {name}: {reason}")]
    BadOverride { name: String, reason: String },
}
