//! Priority Batch Ingestion Library
//!
//! This library crate defines the modules behind the `priority-ingest` binary (`main.rs`).
//!
//! ## Architecture Modules
//! - **`scheduler`**: The batch scheduler and sequential processor. Splits submissions into
//!   fixed-size batches, orders them by priority and submission time, and processes them
//!   one at a time while tracking per-batch status.
//! - **`ingestion`**: The HTTP boundary. Validates submissions, hands them to the scheduler
//!   and serves status polls.
//! - **`config`**: Scheduler tunables (batch size, item latency, minimum batch duration).
//! - **`error`**: Typed errors shared by the modules above.

pub mod config;
pub mod error;
pub mod ingestion;
pub mod scheduler;
