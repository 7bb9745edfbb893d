//! StorageEngine owns the ConnectionPool and implements the storage
//! traits, plus startup migration and pragma configuration.

use std::collections::HashMap;
use std::path::Path;

use vernier_core::errors::StoreError;
use vernier_core::traits::{
    DisputeStore, GrantOutcome, NotificationSink, ProductStore, ProvisionalGrant, RunLockStore,
};
use vernier_core::{
    Confidence, Dispute, DisputeTally, NewNotification, Notification, Product,
};

use crate::migrations;
use crate::pool::ConnectionPool;
use crate::queries;

/// The SQLite-backed store shared by the scoring and escalation engines.
pub struct StorageEngine {
    pool: ConnectionPool,
    /// When true, use the read pool for read operations (file-backed mode).
    /// When false, route all reads through the writer (in-memory mode,
    /// because in-memory read pool connections are isolated databases).
    use_read_pool: bool,
}

impl StorageEngine {
    /// Open a storage engine backed by a file on disk.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let pool = ConnectionPool::open(path, crate::pool::ReadPool::default_size())?;
        let engine = Self {
            pool,
            use_read_pool: true,
        };
        engine.initialize()?;
        tracing::info!(path = %path.display(), "storage engine opened");
        Ok(engine)
    }

    /// Open an in-memory storage engine (for testing).
    /// Routes all reads through the writer since in-memory read pool
    /// connections are isolated databases that can't see writer's changes.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let pool = ConnectionPool::open_in_memory(1)?;
        let engine = Self {
            pool,
            use_read_pool: false,
        };
        engine.initialize()?;
        Ok(engine)
    }

    /// Run migrations on the writer before anything else touches the file.
    fn initialize(&self) -> Result<(), StoreError> {
        self.pool
            .writer
            .with_conn_sync(|conn| migrations::run_migrations(conn))
    }

    /// Get a reference to the connection pool (for maintenance operations).
    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Execute a read-only query on the best available connection.
    /// File-backed: uses the read pool (no writer contention).
    /// In-memory: uses the writer (read pool is isolated).
    fn with_reader<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&rusqlite::Connection) -> Result<T, StoreError>,
    {
        if self.use_read_pool {
            self.pool.readers.with_conn(f)
        } else {
            self.pool.writer.with_conn_sync(f)
        }
    }
}

impl ProductStore for StorageEngine {
    fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        self.with_reader(queries::product_ops::list_products)
    }

    fn get_product(&self, sku: &str) -> Result<Option<Product>, StoreError> {
        self.with_reader(|conn| queries::product_ops::get_product(conn, sku))
    }

    fn set_confidence(&self, sku: &str, confidence: Confidence) -> Result<(), StoreError> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::product_ops::set_confidence(conn, sku, confidence))
    }

    fn upsert_product(&self, product: &Product) -> Result<(), StoreError> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::product_ops::upsert_product(conn, product))
    }
}

impl DisputeStore for StorageEngine {
    fn pending_review(&self) -> Result<Vec<Dispute>, StoreError> {
        self.with_reader(queries::dispute_ops::pending_review)
    }

    fn dispute_tallies(&self) -> Result<HashMap<String, DisputeTally>, StoreError> {
        self.with_reader(queries::dispute_ops::dispute_tallies)
    }

    fn get_dispute(&self, id: &str) -> Result<Option<Dispute>, StoreError> {
        self.with_reader(|conn| queries::dispute_ops::get_dispute(conn, id))
    }

    fn upsert_dispute(&self, dispute: &Dispute) -> Result<(), StoreError> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::dispute_ops::upsert_dispute(conn, dispute))
    }

    fn grant_provisional_edit(
        &self,
        grant: &ProvisionalGrant,
    ) -> Result<GrantOutcome, StoreError> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::dispute_ops::grant_provisional_edit(conn, grant))
    }
}

impl NotificationSink for StorageEngine {
    fn push(&self, notification: NewNotification) -> Result<Notification, StoreError> {
        let stored = Notification::issue(notification);
        self.pool.writer.with_conn_sync(|conn| {
            queries::notification_ops::insert_notification(conn, &stored)
        })?;
        Ok(stored)
    }

    fn notifications_for(&self, user_id: &str) -> Result<Vec<Notification>, StoreError> {
        self.with_reader(|conn| queries::notification_ops::notifications_for(conn, user_id))
    }
}

impl RunLockStore for StorageEngine {
    fn try_acquire(&self, name: &str, holder: &str, ttl_secs: u64) -> Result<bool, StoreError> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::lock_ops::try_acquire(conn, name, holder, ttl_secs))
    }

    fn release(&self, name: &str, holder: &str) -> Result<(), StoreError> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::lock_ops::release(conn, name, holder))
    }
}
