//! Pure domain logic for the revops platform.
//!
//! This crate has zero internal dependencies and performs no I/O, so it can
//! be used by the repository layer, the reconciliation engine, the API, and
//! any CLI tooling alike. The main pieces:
//!
//! - [`inclusion`] -- the appointment inclusion-flag calculator (the
//!   deduplication/sequencing engine core).
//! - [`payment_matching`] -- confidence constants and the pure pieces of the
//!   payment-to-appointment resolver.
//! - [`commission`] -- commission arithmetic and release-status rules.
//! - [`appointment`] -- appointment status vocabulary and the centralized
//!   cancellation predicate.

pub mod appointment;
pub mod commission;
pub mod error;
pub mod inclusion;
pub mod pagination;
pub mod payment_matching;
pub mod types;
