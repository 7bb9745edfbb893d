//! Storage contracts implemented by `vernier-store` and by in-memory test
//! doubles. Engines receive explicit handles; nothing reaches for a
//! module-scope singleton.

mod locks;
mod store;

pub use locks::RunLockStore;
pub use store::{DisputeStore, GrantOutcome, NotificationSink, ProductStore, ProvisionalGrant};
