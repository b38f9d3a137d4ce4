//! Shared query parameter types for API handlers.
//!
//! Common query structs that appear across multiple handler modules are
//! extracted here to avoid duplication.

use revops_core::types::DbId;
use serde::Deserialize;

/// Tenant scope for endpoints that read one company's data (`?company_id=`).
///
/// Axum's `Query` rejection turns a missing or malformed value into a 400.
#[derive(Debug, Deserialize)]
pub struct CompanyScope {
    pub company_id: DbId,
}
