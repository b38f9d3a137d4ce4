//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs for the writes its repository accepts

pub mod appointment;
pub mod closer;
pub mod commission;
pub mod company;
pub mod contact;
pub mod event;
pub mod metrics;
pub mod sale;
