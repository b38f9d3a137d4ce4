//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod appointment_repo;
pub mod closer_repo;
pub mod commission_repo;
pub mod company_repo;
pub mod contact_repo;
pub mod event_repo;
pub mod metrics_repo;
pub mod sale_repo;

pub use appointment_repo::AppointmentRepo;
pub use closer_repo::CloserRepo;
pub use commission_repo::CommissionRepo;
pub use company_repo::CompanyRepo;
pub use contact_repo::ContactRepo;
pub use event_repo::EventRepo;
pub use metrics_repo::MetricsRepo;
pub use sale_repo::SaleRepo;
