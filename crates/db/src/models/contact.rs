//! Contact (prospect) entity model.

use revops_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `contacts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Contact {
    pub id: DbId,
    pub company_id: DbId,
    /// External CRM identifier; upsert key together with `company_id`.
    pub crm_id: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Identity fields carried by a CRM webhook; merged into the existing row
/// on conflict (present fields overwrite, absent fields are kept).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpsertContact {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}
