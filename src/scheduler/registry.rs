//! Status Registry
//!
//! The single source of truth for batch and ingestion status. Maps batch ids to
//! their mutable `BatchRecord` and ingestion ids to their ordered batch id list.
//!
//! Both maps are `DashMap`s: submissions insert concurrently, the processor
//! mutates status fields, and pollers read, all without a global lock. Every
//! read returns a clone taken under the shard lock, so a reader never observes
//! a half-applied update.

use super::types::*;
use crate::error::{Result, SchedulerError};

use dashmap::DashMap;

pub struct StatusRegistry {
    /// `Batch ID -> BatchRecord`.
    batches: DashMap<BatchId, BatchRecord>,
    /// `Ingestion ID -> ordered Batch IDs`.
    ingestions: DashMap<IngestionId, Vec<BatchId>>,
}

impl StatusRegistry {
    pub fn new() -> Self {
        Self {
            batches: DashMap::new(),
            ingestions: DashMap::new(),
        }
    }

    /// Stores a new batch record and appends it to its ingestion's batch list.
    ///
    /// Registering an already known batch id is a no-op.
    pub fn register(&self, record: BatchRecord) {
        if self.batches.contains_key(&record.batch_id) {
            tracing::warn!("Batch {} already registered", record.batch_id);
            return;
        }

        let batch_id = record.batch_id.clone();
        let ingestion_id = record.ingestion_id.clone();
        // Record first, so an ingestion never lists a batch the registry cannot resolve.
        self.batches.insert(batch_id.clone(), record);
        self.ingestions
            .entry(ingestion_id)
            .or_default()
            .push(batch_id);
    }

    /// Makes an ingestion known, even before (or without) any batch.
    pub fn register_ingestion(&self, ingestion_id: &IngestionId) {
        self.ingestions.entry(ingestion_id.clone()).or_default();
    }

    /// Returns a snapshot of a batch record.
    pub fn get(&self, batch_id: &BatchId) -> Result<BatchRecord> {
        self.batches
            .get(batch_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| SchedulerError::BatchNotFound(batch_id.clone()))
    }

    /// Overwrites the status of a batch.
    pub fn set_status(&self, batch_id: &BatchId, status: BatchStatus) -> Result<()> {
        self.update(batch_id, |record| record.status = status)
    }

    /// Applies `f` to a batch record while holding its shard lock.
    ///
    /// Used by the processor to change several fields as one visible update.
    pub fn update<F>(&self, batch_id: &BatchId, f: F) -> Result<()>
    where
        F: FnOnce(&mut BatchRecord),
    {
        let mut entry = self
            .batches
            .get_mut(batch_id)
            .ok_or_else(|| SchedulerError::BatchNotFound(batch_id.clone()))?;
        f(entry.value_mut());
        Ok(())
    }

    /// Returns the ordered batch ids of an ingestion.
    pub fn list_batches(&self, ingestion_id: &IngestionId) -> Result<Vec<BatchId>> {
        self.ingestions
            .get(ingestion_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| SchedulerError::IngestionNotFound(ingestion_id.clone()))
    }

    pub fn contains_ingestion(&self, ingestion_id: &IngestionId) -> bool {
        self.ingestions.contains_key(ingestion_id)
    }

    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    pub fn ingestion_count(&self) -> usize {
        self.ingestions.len()
    }

    /// Counts batches per status as `(not_started, triggered, completed)`.
    pub fn status_counts(&self) -> (usize, usize, usize) {
        let mut not_started = 0;
        let mut triggered = 0;
        let mut completed = 0;

        for entry in self.batches.iter() {
            match entry.status {
                BatchStatus::NotStarted => not_started += 1,
                BatchStatus::Triggered => triggered += 1,
                BatchStatus::Completed => completed += 1,
            }
        }

        (not_started, triggered, completed)
    }
}

impl Default for StatusRegistry {
    fn default() -> Self {
        Self::new()
    }
}
