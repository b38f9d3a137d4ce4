//! Platform event plumbing.
//!
//! Handlers publish [`PlatformEvent`]s to the in-process [`EventBus`];
//! [`EventPersistence`] drains the bus into the `events` table so the
//! activity feed survives restarts. Publishing never blocks the caller
//! and a slow persistence task only costs dropped history, not latency.

pub mod bus;
pub mod persistence;

pub use bus::{EventBus, PlatformEvent};
pub use persistence::EventPersistence;
