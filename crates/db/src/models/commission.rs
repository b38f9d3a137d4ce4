//! Commission entity model.

use revops_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `commissions` table. Amounts are stored rounded to cents.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Commission {
    pub id: DbId,
    pub company_id: DbId,
    pub sale_id: DbId,
    pub closer_id: DbId,
    pub rate: f64,
    pub total_amount: f64,
    pub released_amount: f64,
    /// pending -> partial/released -> paid
    pub release_status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Fields for inserting a commission.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCommission {
    pub sale_id: DbId,
    pub closer_id: DbId,
    pub rate: f64,
    pub total_amount: f64,
    pub released_amount: f64,
    pub release_status: String,
}
