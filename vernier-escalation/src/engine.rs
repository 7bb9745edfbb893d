//! Batch driver for the escalation sweep.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::{Duration, Utc};
use tracing::{debug, info, warn};
use vernier_core::config::EscalationConfig;
use vernier_core::models::{EscalationOutcome, EscalationReport};
use vernier_core::traits::{DisputeStore, ProductStore, ProvisionalGrant};
use vernier_core::{Dispute, RunControl, VernierError, VernierResult};

use crate::eligibility::{self, Eligibility, SkipReason};
use crate::notification;

/// Sweeps disputes stuck in review and grants provisional edits once
/// their grace period runs out.
///
/// One sweep may run at a time per engine instance; a concurrent call
/// fails fast with `RunInProgress`.
pub struct EscalationEngine {
    grace_period: Duration,
    /// Guard: only one sweep can run at a time.
    is_running: Arc<AtomicBool>,
}

impl EscalationEngine {
    pub fn new(config: &EscalationConfig) -> Self {
        Self::with_grace_period(config.grace_period())
    }

    pub fn with_grace_period(grace_period: Duration) -> Self {
        Self {
            grace_period,
            is_running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn grace_period(&self) -> Duration {
        self.grace_period
    }

    /// Check if a sweep is currently running.
    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::Relaxed)
    }

    /// Evaluate every dispute pending review and commit the grants that
    /// clear all checks.
    ///
    /// Loading the pending set is fatal for the sweep; everything after
    /// that is per-dispute and isolated.
    pub fn escalate_all<S>(&self, store: &S, control: &RunControl) -> VernierResult<EscalationReport>
    where
        S: ProductStore + DisputeStore,
    {
        // Acquire the single-execution guard.
        if self
            .is_running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(VernierError::RunInProgress {
                component: "escalation",
            });
        }

        let result = self.run_sweep(store, control);

        // Release the guard.
        self.is_running.store(false, Ordering::SeqCst);

        result
    }

    fn run_sweep<S>(&self, store: &S, control: &RunControl) -> VernierResult<EscalationReport>
    where
        S: ProductStore + DisputeStore,
    {
        let started = Instant::now();
        // One cutoff per sweep: every dispute is judged against the same
        // instant.
        let now = Utc::now();

        let pending = store.pending_review()?;

        let mut report = EscalationReport::default();

        for dispute in &pending {
            if control.should_stop() {
                report.partial = true;
                break;
            }
            report.scanned += 1;

            // Dispute-side checks first; skips here cost no product read.
            let pending_escalation =
                match eligibility::due_for_escalation(dispute, now, self.grace_period) {
                    Ok(p) => p,
                    Err(reason) => {
                        note_skip(&mut report, dispute, &reason);
                        continue;
                    }
                };

            let product = match store.get_product(&dispute.product_sku) {
                Ok(p) => p,
                Err(e) => {
                    warn!(
                        dispute_id = %dispute.id,
                        sku = %dispute.product_sku,
                        error = %e,
                        "product read failed, skipping dispute"
                    );
                    report.errored += 1;
                    continue;
                }
            };
            let Some(product) = product else {
                note_skip(&mut report, dispute, &SkipReason::ProductMissing);
                continue;
            };

            let (editor, observed_modified) =
                match eligibility::confirm_grant(&pending_escalation, Some(&product)) {
                    Eligibility::Escalate {
                        editor,
                        observed_modified,
                    } => (editor, observed_modified),
                    Eligibility::Skip(reason) => {
                        note_skip(&mut report, dispute, &reason);
                        continue;
                    }
                };

            let grant = ProvisionalGrant {
                dispute_id: dispute.id.clone(),
                product_sku: dispute.product_sku.clone(),
                editor: editor.clone(),
                observed_modified,
                notification: notification::provisional_edit_notice(
                    &product.name,
                    dispute,
                    &editor,
                ),
            };

            match store.grant_provisional_edit(&grant) {
                Ok(outcome) if outcome.is_granted() => {
                    info!(
                        dispute_id = %dispute.id,
                        sku = %dispute.product_sku,
                        editor = %editor,
                        "provisional edit granted"
                    );
                    report.granted += 1;
                    report.outcomes.push(EscalationOutcome {
                        dispute_id: dispute.id.clone(),
                        product_sku: dispute.product_sku.clone(),
                        outcome: "granted".to_string(),
                    });
                }
                Ok(outcome) => {
                    // The transaction re-check caught a concurrent writer
                    // between our observation and the commit.
                    warn!(
                        dispute_id = %dispute.id,
                        sku = %dispute.product_sku,
                        outcome = %outcome,
                        "grant lost to a concurrent write"
                    );
                    report.race_lost += 1;
                    report.outcomes.push(EscalationOutcome {
                        dispute_id: dispute.id.clone(),
                        product_sku: dispute.product_sku.clone(),
                        outcome: format!("race lost: {outcome}"),
                    });
                }
                Err(e) => {
                    warn!(
                        dispute_id = %dispute.id,
                        sku = %dispute.product_sku,
                        error = %e,
                        "grant transaction failed, skipping dispute"
                    );
                    report.errored += 1;
                }
            }
        }

        report.duration_ms = started.elapsed().as_millis() as u64;
        info!(
            scanned = report.scanned,
            granted = report.granted,
            skipped = report.skipped.total(),
            race_lost = report.race_lost,
            errored = report.errored,
            partial = report.partial,
            duration_ms = report.duration_ms,
            "escalation sweep complete"
        );

        Ok(report)
    }
}

fn note_skip(report: &mut EscalationReport, dispute: &Dispute, reason: &SkipReason) {
    debug!(
        dispute_id = %dispute.id,
        sku = %dispute.product_sku,
        reason = %reason,
        "dispute skipped"
    );
    match reason {
        SkipReason::AlreadyGranted => report.skipped.already_granted += 1,
        SkipReason::MissingDeadline => report.skipped.missing_deadline += 1,
        SkipReason::WithinGrace { .. } => report.skipped.within_grace += 1,
        SkipReason::ProductMissing => report.skipped.product_missing += 1,
        SkipReason::ProductUpdated => report.skipped.product_updated += 1,
        SkipReason::ProductOccupied => report.skipped.product_occupied += 1,
    }
    report.outcomes.push(EscalationOutcome {
        dispute_id: dispute.id.clone(),
        product_sku: dispute.product_sku.clone(),
        outcome: format!("skipped: {reason}"),
    });
}
