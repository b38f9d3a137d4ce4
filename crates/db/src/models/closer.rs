//! Sales-rep entity model.

use revops_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `closers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Closer {
    pub id: DbId,
    pub company_id: DbId,
    pub name: String,
    pub email: Option<String>,
    /// Commission fraction in [0, 1].
    pub commission_rate: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Fields for inserting a closer.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCloser {
    pub name: String,
    pub email: Option<String>,
    pub commission_rate: f64,
}
