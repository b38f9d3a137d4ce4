//! Sale (payment event) entity model.

use revops_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `sales` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Sale {
    pub id: DbId,
    pub company_id: DbId,
    /// Resolved appointment link; NULL while unmatched or ambiguous.
    pub appointment_id: Option<DbId>,
    pub amount: f64,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_name: Option<String>,
    pub matched_by: Option<String>,
    pub match_confidence: Option<f64>,
    pub manually_matched: bool,
    /// Candidate appointments surfaced on an ambiguous fuzzy match.
    pub match_candidates: Option<serde_json::Value>,
    /// Payment-processor reference (charge / transaction id).
    pub external_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Fields for inserting a sale, match metadata included.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSale {
    pub appointment_id: Option<DbId>,
    pub amount: f64,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_name: Option<String>,
    pub matched_by: Option<String>,
    pub match_confidence: Option<f64>,
    pub manually_matched: bool,
    pub match_candidates: Option<serde_json::Value>,
    pub external_id: Option<String>,
}
