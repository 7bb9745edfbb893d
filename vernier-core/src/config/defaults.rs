//! Default values for every tunable. Config files and environment
//! overrides replace these; absent settings always fall back here.

/// SQLite database location relative to the working directory.
pub const DB_PATH: &str = "vernier.db";

/// How long a crashed run may hold a run lock before another host
/// takes it over.
pub const RUN_LOCK_TTL_SECS: u64 = 1_800;

/// Confidence recalculation cadence for `vernier watch`.
pub const SCORING_INTERVAL_SECS: u64 = 86_400;

/// Escalation sweep cadence for `vernier watch`.
pub const ESCALATION_INTERVAL_SECS: u64 = 3_600;

/// How long a dispute may sit in review before the reporter is offered
/// a provisional edit. Seven days.
pub const GRACE_PERIOD_SECS: u64 = 604_800;
