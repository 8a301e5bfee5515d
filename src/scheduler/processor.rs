//! Sequential Processor
//!
//! Runs one batch at a time through its lifecycle:
//! `NotStarted -> Triggered -> Completed`.
//!
//! ## Per-batch algorithm
//! 1. Mark the batch `Triggered` (visible to pollers immediately).
//! 2. Run the item operation for every id, strictly in sequence.
//! 3. Wait out whatever is left of `min_batch_duration`, measured from step 1.
//! 4. Mark the batch `Completed`.
//!
//! An error from the item operation stops step 2 for that batch, is logged and
//! kept in `BatchRecord::last_error`, and the batch is still marked `Completed`.
//! There is no failed state.

use super::registry::StatusRegistry;
use super::types::*;
use crate::config::SchedulerConfig;

use anyhow::Result;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Type alias for the asynchronous per-item operation.
/// It takes an item id and returns a Future that resolves to a `Result<()>`.
pub type ItemOperationFn =
    Arc<dyn Fn(u64) -> Pin<Box<dyn Future<Output = Result<()>> + Send>> + Send + Sync>;

/// Wraps a closure into an `ItemOperationFn`, erasing its concrete Future type.
pub fn item_operation<F, Fut>(operation: F) -> ItemOperationFn
where
    F: Fn(u64) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    Arc::new(move |id: u64| {
        Box::pin(operation(id)) as Pin<Box<dyn Future<Output = Result<()>> + Send>>
    })
}

/// The default item operation: models an upstream call with a fixed latency.
pub fn simulated_upstream_call(latency: Duration) -> ItemOperationFn {
    item_operation(move |id| async move {
        tokio::time::sleep(latency).await;
        tracing::trace!("Upstream call for item {} returned", id);
        Ok(())
    })
}

pub struct SequentialProcessor {
    registry: Arc<StatusRegistry>,
    operation: ItemOperationFn,
    min_batch_duration: Duration,
}

impl SequentialProcessor {
    /// Creates a processor running the simulated upstream call.
    pub fn new(registry: Arc<StatusRegistry>, config: &SchedulerConfig) -> Self {
        Self::with_operation(
            registry,
            config.min_batch_duration,
            simulated_upstream_call(config.item_latency),
        )
    }

    pub fn with_operation(
        registry: Arc<StatusRegistry>,
        min_batch_duration: Duration,
        operation: ItemOperationFn,
    ) -> Self {
        Self {
            registry,
            operation,
            min_batch_duration,
        }
    }

    /// Processes one dequeued batch to completion. Never returns an error.
    pub async fn process_batch(&self, batch_id: &BatchId) {
        let started = Instant::now();

        let claimed = self.registry.update(batch_id, |record| {
            record.status = BatchStatus::Triggered;
            record.started_at = Some(now_ms());
        });
        let record = match claimed.and_then(|_| self.registry.get(batch_id)) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Skipping dequeued batch: {}", e);
                return;
            }
        };

        tracing::info!(
            "Batch {} triggered ({} ids, priority {:?}, ingestion {})",
            batch_id,
            record.ids.len(),
            record.priority,
            record.ingestion_id
        );

        let outcome = self.run_items(&record.ids).await;

        // The floor holds on the error path too.
        let elapsed = started.elapsed();
        if elapsed < self.min_batch_duration {
            tokio::time::sleep(self.min_batch_duration - elapsed).await;
        }

        let last_error = match outcome {
            Ok(()) => None,
            Err(e) => {
                tracing::error!(
                    "Batch {} failed, marking completed anyway: {:#}",
                    batch_id,
                    e
                );
                Some(format!("{:#}", e))
            }
        };

        let finished = self.registry.update(batch_id, |record| {
            record.status = BatchStatus::Completed;
            record.finished_at = Some(now_ms());
            record.last_error = last_error;
        });

        match finished {
            Ok(()) => tracing::info!(
                "Batch {} completed in {} ms",
                batch_id,
                started.elapsed().as_millis()
            ),
            Err(e) => tracing::error!("Failed to complete batch {}: {}", batch_id, e),
        }
    }

    /// Invokes the item operation for each id, one after another.
    async fn run_items(&self, ids: &[u64]) -> Result<()> {
        for &id in ids {
            (self.operation)(id)
                .await
                .map_err(|e| e.context(format!("item {}", id)))?;
        }
        Ok(())
    }
}
