//! Error Types
//!
//! Typed failures surfaced by the scheduler and the ingestion boundary.
//! Processing failures of the per-item operation are plain `anyhow::Error`s and
//! never leave the processor (see `scheduler::processor`).

use crate::scheduler::types::{BatchId, IngestionId};
use thiserror::Error;

/// Lookup failures of the status registry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("ingestion {0} not found")]
    IngestionNotFound(IngestionId),

    #[error("batch {0} not found")]
    BatchNotFound(BatchId),
}

/// Rejections of a submission before it reaches the scheduler.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("item id {id} is out of range [1, 1000000007]")]
    ItemIdOutOfRange { id: i64 },

    #[error("invalid request body: {0}")]
    MalformedBody(String),
}

/// Invalid `SchedulerConfig` values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max_batch_size must be greater than zero")]
    ZeroBatchSize,
}

pub type Result<T, E = SchedulerError> = std::result::Result<T, E>;
