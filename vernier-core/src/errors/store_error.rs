/// Storage-layer errors for SQLite operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("SQLite error: {message}")]
    Sqlite { message: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    /// A stored field could not be decoded into its domain type
    /// (unrecognized timestamp shape, unknown status string, ...).
    #[error("malformed field {field} on record {record}: {details}")]
    MalformedField {
        record: String,
        field: String,
        details: String,
    },

    #[error("connection lock poisoned: {message}")]
    LockPoisoned { message: String },
}
