use crate::errors::StoreError;

/// Store-level mutual exclusion between batch runs.
///
/// Cron has no memory: if one tick outlives its interval, the next tick
/// starts anyway. A named lock row with a TTL keeps overlapping runs from
/// doubling up while still letting a new run take over after a crash.
pub trait RunLockStore: Send + Sync {
    /// Try to take the named lock. Returns false when another live holder
    /// has it; a holder whose TTL has expired is silently replaced.
    fn try_acquire(&self, name: &str, holder: &str, ttl_secs: u64) -> Result<bool, StoreError>;

    /// Release the lock if `holder` still owns it. Releasing a lock that
    /// was taken over is a no-op, not an error.
    fn release(&self, name: &str, holder: &str) -> Result<(), StoreError>;
}
