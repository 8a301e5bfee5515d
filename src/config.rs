//! Scheduler configuration

use crate::error::ConfigError;
use std::time::Duration;

/// Default number of item identifiers per batch.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 3;
/// Default latency of the simulated upstream call, per item.
pub const DEFAULT_ITEM_LATENCY: Duration = Duration::from_secs(2);
/// Default floor on the wall-clock duration of one batch.
pub const DEFAULT_MIN_BATCH_DURATION: Duration = Duration::from_secs(5);

/// Tunables of the batch scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Maximum number of item identifiers per batch (default: 3)
    pub max_batch_size: usize,
    /// Latency of the simulated per-item operation (default: 2s)
    pub item_latency: Duration,
    /// Minimum time from batch start to completion (default: 5s)
    pub min_batch_duration: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            item_latency: DEFAULT_ITEM_LATENCY,
            min_batch_duration: DEFAULT_MIN_BATCH_DURATION,
        }
    }
}

impl SchedulerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        Ok(())
    }

    pub fn with_max_batch_size(mut self, size: usize) -> Self {
        self.max_batch_size = size;
        self
    }

    pub fn with_item_latency(mut self, latency: Duration) -> Self {
        self.item_latency = latency;
        self
    }

    pub fn with_min_batch_duration(mut self, duration: Duration) -> Self {
        self.min_batch_duration = duration;
        self
    }
}
