//! Batch driver for the confidence formula.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};
use vernier_core::models::{ConfidenceDelta, ScoringReport};
use vernier_core::traits::{DisputeStore, ProductStore};
use vernier_core::{RunControl, VernierError, VernierResult};

use crate::formula;
use crate::terms::ScoreContext;

/// Recomputes confidence for the whole catalog.
///
/// One pass may run at a time per engine instance; a concurrent call
/// fails fast with `RunInProgress` instead of queueing.
pub struct ScoringEngine {
    /// Guard: only one scoring pass can run at a time.
    is_running: Arc<AtomicBool>,
}

impl ScoringEngine {
    pub fn new() -> Self {
        Self {
            is_running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Check if a scoring pass is currently running.
    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::Relaxed)
    }

    /// Score every product and write back the confidences that changed.
    ///
    /// Listing the catalog or loading the tallies is fatal for the run;
    /// a write failure on one product is logged, counted, and skipped so
    /// the rest of the catalog still gets scored.
    pub fn score_all<S>(&self, store: &S, control: &RunControl) -> VernierResult<ScoringReport>
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
                component: "scoring",
            });
        }

        let result = self.run_pass(store, control);

        // Release the guard.
        self.is_running.store(false, Ordering::SeqCst);

        result
    }

    fn run_pass<S>(&self, store: &S, control: &RunControl) -> VernierResult<ScoringReport>
    where
        S: ProductStore + DisputeStore,
    {
        let started = Instant::now();
        // One instant per pass: every product scores against the same now.
        let ctx = ScoreContext::default();

        let products = store.list_products()?;
        let tallies = store.dispute_tallies()?;

        let mut report = ScoringReport::default();

        for product in &products {
            if control.should_stop() {
                report.partial = true;
                break;
            }
            report.scanned += 1;

            // No tally row means no disputes; the default (all zero)
            // scores identically.
            let tally = tallies.get(&product.sku).copied().unwrap_or_default();
            let updated = formula::compute(product, &tally, &ctx);

            if updated == product.confidence {
                report.unchanged += 1;
                continue;
            }

            match store.set_confidence(&product.sku, updated) {
                Ok(()) => {
                    report.updated += 1;
                    report.deltas.push(ConfidenceDelta {
                        sku: product.sku.clone(),
                        previous: product.confidence,
                        updated,
                    });
                }
                Err(e) => {
                    warn!(sku = %product.sku, error = %e, "confidence write failed, skipping record");
                    report.errored += 1;
                }
            }
        }

        report.duration_ms = started.elapsed().as_millis() as u64;
        info!(
            scanned = report.scanned,
            updated = report.updated,
            unchanged = report.unchanged,
            errored = report.errored,
            partial = report.partial,
            duration_ms = report.duration_ms,
            "scoring pass complete"
        );

        Ok(report)
    }

    /// Recompute one product by sku. Returns `None` when the sku does not
    /// exist; otherwise the delta, written back only if the score changed.
    pub fn score_one<S>(&self, store: &S, sku: &str) -> VernierResult<Option<ConfidenceDelta>>
    where
        S: ProductStore + DisputeStore,
    {
        let Some(product) = store.get_product(sku)? else {
            return Ok(None);
        };
        let tally = store
            .dispute_tallies()?
            .get(sku)
            .copied()
            .unwrap_or_default();

        let updated = formula::compute(&product, &tally, &ScoreContext::default());
        if updated != product.confidence {
            store.set_confidence(sku, updated)?;
        }

        Ok(Some(ConfidenceDelta {
            sku: product.sku,
            previous: product.confidence,
            updated,
        }))
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new()
    }
}
