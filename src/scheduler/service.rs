//! Scheduler Service
//!
//! Owns every piece of scheduler state (registry, queue, partitioner, processor and
//! the processing permit). One instance is built at process start and shared as
//! `Arc<Scheduler>` for the lifetime of the process.
//!
//! ## Two locks
//! - The queue's own mutex, held only for a single push/reorder/pop.
//! - The processing permit, held for a whole drain loop. It is taken with
//!   `try_lock`: a trigger that finds it held returns at once, and the active
//!   loop picks up the newly queued entries.

use super::partitioner::BatchPartitioner;
use super::processor::{ItemOperationFn, SequentialProcessor};
use super::queue::PriorityQueue;
use super::registry::StatusRegistry;
use super::types::*;
use crate::config::SchedulerConfig;
use crate::error::{ConfigError, Result};

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

/// Point-in-time view of one ingestion, with its derived status.
#[derive(Debug, Clone)]
pub struct IngestionSnapshot {
    pub ingestion_id: IngestionId,
    pub status: BatchStatus,
    pub batches: Vec<BatchRecord>,
}

pub struct Scheduler {
    config: SchedulerConfig,
    registry: Arc<StatusRegistry>,
    queue: Arc<PriorityQueue>,
    partitioner: BatchPartitioner,
    processor: SequentialProcessor,
    /// Held by the one active drain loop.
    permit: Mutex<()>,
    /// Set while the permit is held. Read by `is_draining`.
    draining: AtomicBool,
}

impl Scheduler {
    /// Creates a scheduler that runs the simulated upstream call per item.
    pub fn new(config: SchedulerConfig) -> Result<Arc<Self>, ConfigError> {
        config.validate()?;
        let registry = Arc::new(StatusRegistry::new());
        let processor = SequentialProcessor::new(registry.clone(), &config);
        Ok(Self::assemble(config, registry, processor))
    }

    /// Creates a scheduler with a custom per-item operation.
    pub fn with_operation(
        config: SchedulerConfig,
        operation: ItemOperationFn,
    ) -> Result<Arc<Self>, ConfigError> {
        config.validate()?;
        let registry = Arc::new(StatusRegistry::new());
        let processor = SequentialProcessor::with_operation(
            registry.clone(),
            config.min_batch_duration,
            operation,
        );
        Ok(Self::assemble(config, registry, processor))
    }

    fn assemble(
        config: SchedulerConfig,
        registry: Arc<StatusRegistry>,
        processor: SequentialProcessor,
    ) -> Arc<Self> {
        let queue = Arc::new(PriorityQueue::new());
        let partitioner =
            BatchPartitioner::new(config.max_batch_size, registry.clone(), queue.clone());

        Arc::new(Self {
            config,
            registry,
            queue,
            partitioner,
            processor,
            permit: Mutex::new(()),
            draining: AtomicBool::new(false),
        })
    }

    /// Partitions, registers and enqueues a submission without triggering processing.
    ///
    /// An empty `ids` list still registers the ingestion, with no batches.
    pub fn submit(&self, ids: &[u64], priority: Priority) -> IngestionId {
        let ingestion_id = IngestionId::new();
        self.registry.register_ingestion(&ingestion_id);
        let batches = self.partitioner.partition(&ingestion_id, ids, priority);

        tracing::info!(
            "Ingestion {} accepted: {} ids in {} batches ({:?})",
            ingestion_id,
            ids.len(),
            batches.len(),
            priority
        );

        ingestion_id
    }

    /// Submits and hands processing to a background task. Returns immediately.
    pub fn ingest(self: &Arc<Self>, ids: &[u64], priority: Priority) -> IngestionId {
        let ingestion_id = self.submit(ids, priority);
        self.spawn_trigger();
        ingestion_id
    }

    /// Runs `trigger` on a new tokio task.
    pub fn spawn_trigger(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let scheduler = self.clone();
        tokio::spawn(async move {
            scheduler.trigger().await;
        })
    }

    /// Drains the queue if no drain loop is active. Safe to call redundantly.
    pub async fn trigger(&self) {
        loop {
            let permit = match self.permit.try_lock() {
                Ok(permit) => permit,
                Err(_) => {
                    tracing::debug!("Drain loop already active, deferring to it");
                    return;
                }
            };

            self.draining.store(true, Ordering::SeqCst);
            self.drain().await;
            self.draining.store(false, Ordering::SeqCst);
            drop(permit);

            // An entry pushed between the last pop and the release would
            // otherwise wait for the next submission.
            if self.queue.is_empty() {
                return;
            }
        }
    }

    /// Processes queued batches one at a time until the queue is empty.
    async fn drain(&self) {
        tracing::info!("Drain loop started ({} pending)", self.queue.len());
        let mut processed = 0usize;

        loop {
            self.queue.reorder();
            let Some(entry) = self.queue.pop_front() else {
                break;
            };
            self.processor.process_batch(&entry.batch_id).await;
            processed += 1;
        }

        tracing::info!("Drain loop finished after {} batches", processed);
    }

    /// Looks up an ingestion and derives its overall status.
    pub fn ingestion_status(&self, ingestion_id: &IngestionId) -> Result<IngestionSnapshot> {
        let batch_ids = self.registry.list_batches(ingestion_id)?;

        let batches = batch_ids
            .iter()
            .map(|batch_id| self.registry.get(batch_id))
            .collect::<Result<Vec<_>>>()?;

        let status = derive_ingestion_status(batches.iter().map(|b| b.status));

        Ok(IngestionSnapshot {
            ingestion_id: ingestion_id.clone(),
            status,
            batches,
        })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<StatusRegistry> {
        &self.registry
    }

    pub fn queue(&self) -> &Arc<PriorityQueue> {
        &self.queue
    }

    pub fn pending_len(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` while a drain loop is active. Never touches the permit.
    pub fn is_draining(&self) -> bool {
        self.draining.load(Ordering::SeqCst)
    }
}
