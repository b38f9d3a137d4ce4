//! Orchestration between the pure domain logic and the database: the
//! contact reconciliation driver and the payment ingestion pipeline.
//!
//! Shared by the API (reconcile after webhooks, ingest payments) and the
//! worker binary (bulk reconciliation sweep), so it lives in its own crate
//! below both.

pub mod payments;
pub mod reconcile;
