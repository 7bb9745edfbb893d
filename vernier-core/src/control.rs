//! Cooperative cancellation for long batch passes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};

/// Shared stop signal checked between records during a batch pass.
///
/// A pass that observes [`RunControl::should_stop`] finishes the record in
/// flight, marks its report as partial, and returns normally. Cloning is
/// cheap; all clones share the same cancel flag.
#[derive(Debug, Clone)]
pub struct RunControl {
    cancelled: Arc<AtomicBool>,
    deadline: Option<DateTime<Utc>>,
}

impl RunControl {
    /// A control that never stops a pass on its own.
    pub fn unbounded() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: None,
        }
    }

    /// A control that asks the pass to stop once `deadline` has passed.
    pub fn with_deadline(deadline: DateTime<Utc>) -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: Some(deadline),
        }
    }

    /// Request cancellation from another thread or a signal handler.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// True once the pass should wind down, either because it was cancelled
    /// or because the deadline elapsed.
    pub fn should_stop(&self) -> bool {
        if self.is_cancelled() {
            return true;
        }
        match self.deadline {
            Some(deadline) => Utc::now() >= deadline,
            None => false,
        }
    }
}

impl Default for RunControl {
    fn default() -> Self {
        Self::unbounded()
    }
}
