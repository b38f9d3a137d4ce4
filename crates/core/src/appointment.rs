//! Appointment status vocabulary and the cancellation predicate.
//!
//! Statuses arrive from CRM webhooks as lowercase strings; `outcome` is a
//! free-form post-call-note label that may independently signal
//! cancellation. Every component that needs to know whether an appointment
//! is cancelled goes through [`is_cancelled`] -- the comparison is never
//! duplicated elsewhere.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

pub const STATUS_SCHEDULED: &str = "scheduled";
pub const STATUS_SHOWED: &str = "showed";
pub const STATUS_NO_SHOW: &str = "no_show";
pub const STATUS_SIGNED: &str = "signed";
pub const STATUS_CONTRACT_SENT: &str = "contract_sent";
pub const STATUS_CANCELLED: &str = "cancelled";
pub const STATUS_RESCHEDULED: &str = "rescheduled";

pub const VALID_STATUSES: &[&str] = &[
    STATUS_SCHEDULED,
    STATUS_SHOWED,
    STATUS_NO_SHOW,
    STATUS_SIGNED,
    STATUS_CONTRACT_SENT,
    STATUS_CANCELLED,
    STATUS_RESCHEDULED,
];

/// Statuses that count as "the prospect showed up" for reporting.
pub const SHOWED_STATUSES: &[&str] = &[STATUS_SHOWED, STATUS_SIGNED, STATUS_CONTRACT_SENT];

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate that `status` is one of the allowed lifecycle statuses.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid appointment status '{status}'. Must be one of: {}",
            VALID_STATUSES.join(", ")
        )))
    }
}

// ---------------------------------------------------------------------------
// Cancellation predicate
// ---------------------------------------------------------------------------

/// Whether a status/outcome pair marks an appointment as cancelled.
///
/// `status` and `outcome` can each independently signal cancellation
/// ("cancelled", case-insensitive; outcome is trimmed because it is
/// free-form note text). When the two disagree, cancellation wins.
pub fn is_cancelled(status: &str, outcome: Option<&str>) -> bool {
    status.eq_ignore_ascii_case(STATUS_CANCELLED)
        || outcome.is_some_and(|o| o.trim().eq_ignore_ascii_case(STATUS_CANCELLED))
}

// ---------------------------------------------------------------------------
// AppointmentRecord
// ---------------------------------------------------------------------------

/// The projection of an appointment the inclusion-flag calculator operates
/// on. The engine builds one per row when fetching a contact's sibling set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentRecord {
    pub id: DbId,
    pub contact_id: Option<DbId>,
    /// Business chronology key; `None` for rows the CRM never scheduled.
    pub scheduled_at: Option<Timestamp>,
    /// Ingestion time, used only to break `scheduled_at` ties.
    pub created_at: Timestamp,
    pub status: String,
    pub outcome: Option<String>,
}

impl AppointmentRecord {
    pub fn is_cancelled(&self) -> bool {
        is_cancelled(&self.status, self.outcome.as_deref())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_status_accepts_all_known() {
        for status in VALID_STATUSES {
            assert!(validate_status(status).is_ok());
        }
    }

    #[test]
    fn validate_status_rejects_unknown() {
        assert!(validate_status("booked").is_err());
        assert!(validate_status("").is_err());
        assert!(validate_status("Scheduled").is_err());
    }

    #[test]
    fn cancelled_status_is_cancelled() {
        assert!(is_cancelled("cancelled", None));
        assert!(is_cancelled("CANCELLED", None));
    }

    #[test]
    fn cancelled_outcome_overrides_live_status() {
        assert!(is_cancelled("scheduled", Some("Cancelled")));
        assert!(is_cancelled("showed", Some("  cancelled ")));
    }

    #[test]
    fn non_cancelled_pairs_are_not_cancelled() {
        assert!(!is_cancelled("scheduled", None));
        assert!(!is_cancelled("no_show", Some("no pitch given")));
        assert!(!is_cancelled("showed", Some("signed")));
    }
}
