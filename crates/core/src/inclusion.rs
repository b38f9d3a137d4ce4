//! Inclusion-flag calculation for appointment deduplication.
//!
//! Contacts reschedule, no-show, and re-book; the CRM keeps every attempt as
//! its own appointment row. Reporting must count each prospect journey once
//! per real slot, so every appointment carries an `inclusion_flag`:
//!
//! - `None` -- row is unusable for metrics (no contact link or no
//!   scheduled time) and is excluded outright.
//! - `Some(0)` -- a cancellation superseded by other activity; kept for
//!   audit but never counted.
//! - `Some(n)` for `n >= 1` -- the appointment's 1-based chronological
//!   position among the contact's non-cancelled appointments.
//!
//! Rules are applied in order: validity, cancellation handling, then
//! sequence position. No-shows are deliberately not special-cased; a
//! prospect who failed to show still consumed a slot. The calculation is a
//! pure function of the contact's appointment group, so re-running it
//! against unchanged rows always reproduces the same flags.

use serde::{Deserialize, Serialize};

use crate::appointment::AppointmentRecord;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Flag assignment
// ---------------------------------------------------------------------------

/// One appointment's computed flag, ready to be written back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagAssignment {
    pub appointment_id: DbId,
    pub inclusion_flag: Option<i32>,
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

/// Compute the inclusion flag for one appointment.
///
/// `group` must contain every appointment belonging to the same contact as
/// the target, including the target itself. Returns `None` when the target
/// is absent from the group or fails validity (no `contact_id` or no
/// `scheduled_at`).
pub fn calculate_inclusion_flag(appointment_id: DbId, group: &[AppointmentRecord]) -> Option<i32> {
    let target = group.iter().find(|a| a.id == appointment_id)?;

    // Rows outside any contact timeline cannot be ranked.
    target.contact_id?;
    let scheduled_at = target.scheduled_at?;

    if target.is_cancelled() {
        let has_live_sibling = group.iter().any(|a| a.id != target.id && !a.is_cancelled());
        if has_live_sibling {
            return Some(0);
        }
        // Every appointment for this contact is cancelled. The most recent
        // cancellation represents the journey; earlier ones stay suppressed.
        let target_key = (target.scheduled_at, target.created_at);
        let is_latest = group
            .iter()
            .filter(|a| a.is_cancelled())
            .all(|a| (a.scheduled_at, a.created_at) <= target_key);
        return Some(if is_latest { 1 } else { 0 });
    }

    // Non-cancelled appointments (no-shows included) occupy one slot each in
    // the contact's chronology. Position is the count of earlier live slots
    // plus one, with ingestion time and row id breaking scheduling ties so
    // positions stay dense.
    let key = (scheduled_at, target.created_at, target.id);
    let earlier = group
        .iter()
        .filter(|a| a.id != target.id && !a.is_cancelled())
        .filter_map(|a| a.scheduled_at.map(|s| (s, a.created_at, a.id)))
        .filter(|k| *k < key)
        .count();
    Some(earlier as i32 + 1)
}

/// Compute flags for an entire contact group in one pass.
///
/// The result covers every appointment in `group`, so callers can diff the
/// assignments against stored flags and persist only what changed.
pub fn compute_group_flags(group: &[AppointmentRecord]) -> Vec<FlagAssignment> {
    group
        .iter()
        .map(|a| FlagAssignment {
            appointment_id: a.id,
            inclusion_flag: calculate_inclusion_flag(a.id, group),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
