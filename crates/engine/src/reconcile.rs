//! Contact reconciliation driver.
//!
//! An appointment's inclusion flag depends on its siblings' current state,
//! so any mutation that can change sequencing triggers a recalculation of
//! the whole contact group, never a single row. The driver reads one
//! snapshot per contact, computes every flag against it, and persists only
//! the flags that changed.
//!
//! There is no cross-contact transaction: flags are advisory metrics
//! inputs, recomputable at any time from source-of-truth fields, and a
//! concurrent sibling mutation is healed by the next run (the worker sweep
//! guarantees eventual convergence).

use serde::Serialize;
use sqlx::PgPool;

use revops_core::appointment::AppointmentRecord;
use revops_core::inclusion::compute_group_flags;
use revops_core::types::DbId;
use revops_db::repositories::AppointmentRepo;

/// Contact groups processed per page during a bulk run.
pub const RECALC_BATCH_SIZE: i64 = 100;

/// Aggregate counts reported by a reconciliation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecalcSummary {
    /// Appointments examined.
    pub total: u64,
    /// Appointments whose stored flag actually changed.
    pub updated: u64,
    /// Appointments whose flag could not be persisted.
    pub errors: u64,
}

impl RecalcSummary {
    fn absorb(&mut self, other: RecalcSummary) {
        self.total += other.total;
        self.updated += other.updated;
        self.errors += other.errors;
    }
}

/// Recompute and persist inclusion flags for one contact's appointments.
///
/// Idempotent: unchanged rows produce no writes. A per-row persistence
/// failure is logged and counted, not propagated, so one bad row never
/// blocks its siblings.
pub async fn recalculate_contact_flags(
    pool: &PgPool,
    company_id: DbId,
    contact_id: DbId,
) -> Result<RecalcSummary, sqlx::Error> {
    let siblings = AppointmentRepo::list_by_contact(pool, company_id, contact_id).await?;
    let group: Vec<AppointmentRecord> = siblings.iter().map(AppointmentRecord::from).collect();

    let mut summary = RecalcSummary {
        total: group.len() as u64,
        ..RecalcSummary::default()
    };
    for assignment in compute_group_flags(&group) {
        match AppointmentRepo::set_inclusion_flag(
            pool,
            assignment.appointment_id,
            assignment.inclusion_flag,
        )
        .await
        {
            Ok(changed) => summary.updated += changed,
            Err(error) => {
                tracing::warn!(
                    appointment_id = assignment.appointment_id,
                    contact_id,
                    %error,
                    "failed to persist inclusion flag"
                );
                summary.errors += 1;
            }
        }
    }
    Ok(summary)
}

/// Recompute inclusion flags for every contact, optionally scoped to one
/// company.
///
/// Pages (company, contact) pairs in fixed-size batches with per-contact
/// isolation: a failed group is counted and skipped. Stale flags on
/// appointments with no contact link are cleared in a single pass first.
/// Infrastructure faults (a page query failing) propagate.
pub async fn recalculate_all_flags(
    pool: &PgPool,
    company_id: Option<DbId>,
) -> Result<RecalcSummary, sqlx::Error> {
    let mut summary = RecalcSummary::default();

    let cleared = AppointmentRepo::clear_flags_for_unlinked(pool, company_id).await?;
    summary.total += cleared;
    summary.updated += cleared;

    let mut after = None;
    loop {
        let page =
            AppointmentRepo::contact_pairs_page(pool, company_id, after, RECALC_BATCH_SIZE).await?;
        let Some(&last) = page.last() else { break };

        for &(pair_company, contact_id) in &page {
            match recalculate_contact_flags(pool, pair_company, contact_id).await {
                Ok(contact) => summary.absorb(contact),
                Err(error) => {
                    tracing::warn!(
                        company_id = pair_company,
                        contact_id,
                        %error,
                        "contact reconciliation failed, continuing"
                    );
                    summary.errors += 1;
                }
            }
        }
        after = Some(last);
    }

    tracing::info!(
        total = summary.total,
        updated = summary.updated,
        errors = summary.errors,
        "bulk flag recalculation finished"
    );
    Ok(summary)
}
