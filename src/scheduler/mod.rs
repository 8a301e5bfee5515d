//! Batch Scheduler Module
//!
//! Implements the in-memory, single-process priority batch scheduler that sits
//! behind the HTTP API.
//!
//! ## Architecture Overview
//! 1. **Partitioning**: A submission is split into batches of at most
//!    `max_batch_size` ids. Each batch gets a fresh id and is registered as `NotStarted`.
//! 2. **Queueing**: A lightweight reference to each batch is appended to the
//!    `PriorityQueue`.
//! 3. **Triggering**: Every submission spawns a trigger. At most one drain loop
//!    runs at a time; concurrent triggers defer to the active one.
//! 4. **Processing**: The drain loop reorders the queue by `(priority, created_at)`,
//!    pops the front entry and runs it through the `SequentialProcessor`, until
//!    the queue is empty.
//!
//! ## Submodules
//! - **`types`**: Identifiers, priorities, the status state machine and batch records.
//! - **`partitioner`**: Splits id lists into batches and records them.
//! - **`registry`**: Concurrent batch/ingestion status store.
//! - **`queue`**: Pending batch references with explicit `reorder`.
//! - **`processor`**: Per-batch execution with the minimum-duration floor.
//! - **`service`**: The `Scheduler` context that ties everything together.

pub mod partitioner;
pub mod processor;
pub mod queue;
pub mod registry;
pub mod service;
pub mod types;
