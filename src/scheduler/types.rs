use serde::{Deserialize, Serialize};
use std::fmt;

/// Smallest accepted item identifier.
pub const MIN_ITEM_ID: u64 = 1;
/// Largest accepted item identifier (10^9 + 7).
pub const MAX_ITEM_ID: u64 = 1_000_000_007;

/// Unique identifier for one client submission.
///
/// Wrapper around a UUID string; handed back to the client and used as the
/// polling key for `GET /status/{ingestion_id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct IngestionId(pub String);

impl IngestionId {
    /// Generates a new random UUID v4-based IngestionId.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for IngestionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for IngestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Globally unique identifier for a batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct BatchId(pub String);

impl BatchId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for BatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Priority class attached to a whole ingestion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Numeric rank used for queue ordering. Lower is processed first.
    pub fn weight(self) -> u8 {
        match self {
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }
}

/// Lifecycle state of a batch.
///
/// The only transitions are `NotStarted -> Triggered -> Completed`.
/// A processing error does not have its own state: the batch still ends up `Completed`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    /// Waiting in the priority queue.
    NotStarted,
    /// Dequeued by the processor and currently in flight.
    Triggered,
    /// Terminal. Reached after the work and the minimum duration, or after an error.
    Completed,
}

impl BatchStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BatchStatus::NotStarted => "not_started",
            BatchStatus::Triggered => "triggered",
            BatchStatus::Completed => "completed",
        }
    }

    pub fn is_terminal(self) -> bool {
        self == BatchStatus::Completed
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The mutable record kept by the `StatusRegistry` for every batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRecord {
    pub batch_id: BatchId,
    /// The ingestion this batch belongs to.
    pub ingestion_id: IngestionId,
    /// Item identifiers, in submission order.
    pub ids: Vec<u64>,
    pub priority: Priority,
    /// Timestamp (ms) of the submission; shared by all batches of one ingestion.
    pub created_at: u64,
    pub status: BatchStatus,
    /// Timestamp (ms) when the processor picked the batch up.
    pub started_at: Option<u64>,
    /// Timestamp (ms) when the batch reached `Completed`.
    pub finished_at: Option<u64>,
    /// Error swallowed while processing, if any.
    pub last_error: Option<String>,
}

/// Lightweight reference to a pending batch, as stored in the `PriorityQueue`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    pub batch_id: BatchId,
    pub weight: u8,
    pub created_at: u64,
}

impl QueueEntry {
    pub fn for_batch(record: &BatchRecord) -> Self {
        Self {
            batch_id: record.batch_id.clone(),
            weight: record.priority.weight(),
            created_at: record.created_at,
        }
    }

    /// Ordering key: priority weight first, then submission time.
    pub fn sort_key(&self) -> (u8, u64) {
        (self.weight, self.created_at)
    }
}

/// Derives the status of an ingestion from the statuses of its batches.
///
/// `NotStarted` iff every batch is `NotStarted`, `Completed` iff every batch is
/// `Completed`, otherwise `Triggered`.
pub fn derive_ingestion_status<I>(statuses: I) -> BatchStatus
where
    I: IntoIterator<Item = BatchStatus>,
{
    let mut all_not_started = true;
    let mut all_completed = true;

    for status in statuses {
        all_not_started &= status == BatchStatus::NotStarted;
        all_completed &= status == BatchStatus::Completed;
    }

    if all_not_started {
        BatchStatus::NotStarted
    } else if all_completed {
        BatchStatus::Completed
    } else {
        BatchStatus::Triggered
    }
}

/// Returns `true` if `id` lies within `[MIN_ITEM_ID, MAX_ITEM_ID]`.
pub fn is_valid_item_id(id: u64) -> bool {
    (MIN_ITEM_ID..=MAX_ITEM_ID).contains(&id)
}

/// Helper to get the current system time in milliseconds.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}
