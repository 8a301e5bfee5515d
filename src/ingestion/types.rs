//! Ingestion API Types
//!
//! Data Transfer Objects (DTOs) for the HTTP boundary and the endpoint paths
//! they are served on.

use crate::scheduler::service::IngestionSnapshot;
use crate::scheduler::types::{BatchId, BatchRecord, BatchStatus, IngestionId, Priority};
use serde::{Deserialize, Serialize};

pub const ENDPOINT_ROOT: &str = "/";
pub const ENDPOINT_HEALTH: &str = "/health";
pub const ENDPOINT_INGEST: &str = "/ingest";
pub const ENDPOINT_STATUS: &str = "/status/:ingestion_id";

/// Body of `POST /ingest`.
///
/// Ids are read as signed integers so that negative values reach range
/// validation and are rejected with 400 like any other out-of-range id.
#[derive(Debug, Serialize, Deserialize)]
pub struct IngestRequest {
    pub ids: Vec<i64>,
    pub priority: Priority,
}

/// Returned immediately after a submission is accepted.
#[derive(Debug, Serialize, Deserialize)]
pub struct IngestResponse {
    pub ingestion_id: IngestionId,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct BatchStatusView {
    pub batch_id: BatchId,
    pub ids: Vec<u64>,
    pub status: BatchStatus,
}

impl From<BatchRecord> for BatchStatusView {
    fn from(record: BatchRecord) -> Self {
        Self {
            batch_id: record.batch_id,
            ids: record.ids,
            status: record.status,
        }
    }
}

/// Body of `GET /status/{ingestion_id}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct IngestionStatusResponse {
    pub ingestion_id: IngestionId,
    pub status: BatchStatus,
    pub batches: Vec<BatchStatusView>,
}

impl From<IngestionSnapshot> for IngestionStatusResponse {
    fn from(snapshot: IngestionSnapshot) -> Self {
        Self {
            ingestion_id: snapshot.ingestion_id,
            status: snapshot.status,
            batches: snapshot.batches.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl ToString) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
}
