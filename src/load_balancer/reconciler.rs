//! Applies pool operations to the store.

use std::sync::Arc;

use crate::load_balancer::store::{PoolOperation, PoolStore, StoreError};
use crate::observability::metrics;

/// What a batch actually changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ApplyReport {
    /// Members inserted because they were missing.
    pub inserted: usize,
    /// `EnsurePresent` operations that found the member already listed.
    pub already_present: usize,
    /// `EnsureAbsent` operations issued.
    pub removed: usize,
    pub reloaded: bool,
}

/// Translates tracker decisions into idempotent store mutations.
#[derive(Clone)]
pub struct BalancerReconciler {
    store: Arc<dyn PoolStore>,
}

impl BalancerReconciler {
    pub fn new(store: Arc<dyn PoolStore>) -> Self {
        Self { store }
    }

    /// Apply a batch, reloading once at the end if anything may have changed.
    ///
    /// Inserts only count as a change when the member was missing. Any
    /// `EnsureAbsent` always forces the reload, whether or not the member was
    /// listed.
    pub async fn apply(&self, ops: &[PoolOperation]) -> Result<ApplyReport, StoreError> {
        let mut report = ApplyReport::default();
        if ops.is_empty() {
            return Ok(report);
        }

        for op in ops {
            match *op {
                PoolOperation::EnsurePresent(member) => {
                    if self.store.exists(member).await? {
                        tracing::info!(%member, "Already in the pool, skipping");
                        report.already_present += 1;
                    } else {
                        tracing::info!(%member, "Adding to the pool");
                        self.store.insert(member).await?;
                        metrics::record_pool_mutation("insert");
                        report.inserted += 1;
                    }
                }
                PoolOperation::EnsureAbsent(member) => {
                    tracing::info!(%member, "Removing from the pool");
                    self.store.delete(member).await?;
                    metrics::record_pool_mutation("delete");
                    report.removed += 1;
                }
            }
        }

        if report.inserted > 0 || report.removed > 0 {
            tracing::info!("Reloading front end configuration");
            self.store.reload().await?;
            metrics::record_reload();
            report.reloaded = true;
        } else {
            tracing::info!("No missing balancer members found");
        }

        Ok(report)
    }
}
