//! HTTP request handlers, one module per resource.

pub mod admin;
pub mod appointments;
pub mod commissions;
pub mod contacts;
pub mod events;
pub mod metrics;
pub mod sales;
pub mod webhooks;
