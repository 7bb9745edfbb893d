/// Vernier engine version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Wire string for the provisional-edit notification type. The webapp's
/// notification center filters on this value; do not change it.
pub const PROVISIONAL_EDIT_KIND: &str = "provisional_edit";

/// Audit label written on grant notifications.
pub const GRANT_STATUS_LABEL: &str = "Granted";

/// Run-lock name held during a confidence scoring pass.
pub const SCORING_LOCK: &str = "scoring";

/// Run-lock name held during an escalation sweep.
pub const ESCALATION_LOCK: &str = "escalation";
