//! Appointment entity model and write DTOs.

use revops_core::appointment::AppointmentRecord;
use revops_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `appointments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Appointment {
    pub id: DbId,
    pub company_id: DbId,
    /// External CRM identifier; upsert key together with `company_id`.
    pub crm_id: Option<String>,
    pub contact_id: Option<DbId>,
    pub closer_id: Option<DbId>,
    /// Business chronology key, distinct from `created_at`.
    pub scheduled_at: Option<Timestamp>,
    pub status: String,
    pub outcome: Option<String>,
    /// Derived sequencing tag: NULL = uncategorized, 0 = excluded,
    /// N >= 1 = Nth countable appointment for the contact.
    pub inclusion_flag: Option<i32>,
    pub cash_collected: Option<f64>,
    pub total_price: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&Appointment> for AppointmentRecord {
    fn from(row: &Appointment) -> Self {
        AppointmentRecord {
            id: row.id,
            contact_id: row.contact_id,
            scheduled_at: row.scheduled_at,
            created_at: row.created_at,
            status: row.status.clone(),
            outcome: row.outcome.clone(),
        }
    }
}

/// Fields carried by a CRM appointment event. On conflict with an existing
/// `(company_id, crm_id)` row, `status` always overwrites while the
/// remaining fields merge (present overwrites, absent keeps).
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertAppointment {
    pub contact_id: Option<DbId>,
    pub closer_id: Option<DbId>,
    pub scheduled_at: Option<Timestamp>,
    pub status: String,
    pub outcome: Option<String>,
    pub cash_collected: Option<f64>,
    pub total_price: Option<f64>,
}

/// Post-call-note submission: outcome plus collected amounts, optionally
/// advancing the status.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordOutcome {
    pub outcome: Option<String>,
    pub cash_collected: Option<f64>,
    pub total_price: Option<f64>,
    pub status: Option<String>,
}
