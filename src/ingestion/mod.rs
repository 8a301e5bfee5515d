//! Ingestion API Module
//!
//! The thin HTTP adapter in front of the `Scheduler`.
//!
//! ## Endpoints
//! - `POST /ingest`: Validates ids, submits them and returns an ingestion id immediately.
//! - `GET /status/{ingestion_id}`: Derived ingestion status plus per-batch status.
//! - `GET /health`, `GET /`: Liveness probes.

pub mod handlers;
pub mod types;

#[cfg(test)]
mod tests;
