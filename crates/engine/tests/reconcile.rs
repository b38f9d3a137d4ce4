//! Reconciliation driver tests against a real database: full journeys,
//! idempotent re-runs, and the bulk sweep.

use chrono::{Duration, Utc};
use sqlx::PgPool;

use revops_core::types::{DbId, Timestamp};
use revops_db::models::appointment::{Appointment, UpsertAppointment};
use revops_db::models::contact::UpsertContact;
use revops_db::repositories::{AppointmentRepo, CompanyRepo, ContactRepo};
use revops_engine::reconcile::{recalculate_all_flags, recalculate_contact_flags};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn day(offset: i64) -> Timestamp {
    // Well inside the past so ordering, not wall-clock, decides.
    Utc::now() - Duration::days(60) + Duration::days(offset)
}

async fn seed_contact(pool: &PgPool, company_name: &str) -> (DbId, DbId) {
    let company = CompanyRepo::create(pool, company_name).await.unwrap();
    let contact = ContactRepo::upsert_by_crm_id(
        pool,
        company.id,
        "crm-contact",
        &UpsertContact::default(),
    )
    .await
    .unwrap();
    (company.id, contact.id)
}

async fn add_appointment(
    pool: &PgPool,
    company_id: DbId,
    crm_id: &str,
    contact_id: Option<DbId>,
    scheduled_day: Option<i64>,
    status: &str,
    outcome: Option<&str>,
) -> Appointment {
    AppointmentRepo::upsert_by_crm_id(
        pool,
        company_id,
        crm_id,
        &UpsertAppointment {
            contact_id,
            closer_id: None,
            scheduled_at: scheduled_day.map(day),
            status: status.to_string(),
            outcome: outcome.map(String::from),
            cash_collected: None,
            total_price: None,
        },
    )
    .await
    .unwrap()
}

async fn flag_of(pool: &PgPool, id: DbId) -> Option<i32> {
    AppointmentRepo::find_by_id(pool, id).await.unwrap().unwrap().inclusion_flag
}

// ---------------------------------------------------------------------------
// Per-contact reconciliation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn rebooking_journey_gets_expected_flags(pool: PgPool) {
    let (company_id, contact_id) = seed_contact(&pool, "Acme").await;

    let a1 = add_appointment(&pool, company_id, "a1", Some(contact_id), Some(1), "cancelled", None)
        .await;
    let a2 =
        add_appointment(&pool, company_id, "a2", Some(contact_id), Some(3), "no_show", None).await;
    let a3 = add_appointment(&pool, company_id, "a3", Some(contact_id), Some(5), "cancelled", None)
        .await;
    let a4 = add_appointment(
        &pool,
        company_id,
        "a4",
        Some(contact_id),
        Some(7),
        "showed",
        Some("signed"),
    )
    .await;

    let summary = recalculate_contact_flags(&pool, company_id, contact_id).await.unwrap();
    assert_eq!(summary.total, 4);
    assert_eq!(summary.updated, 4);
    assert_eq!(summary.errors, 0);

    assert_eq!(flag_of(&pool, a1.id).await, Some(0));
    assert_eq!(flag_of(&pool, a2.id).await, Some(1));
    assert_eq!(flag_of(&pool, a3.id).await, Some(0));
    assert_eq!(flag_of(&pool, a4.id).await, Some(2));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rerunning_changes_nothing(pool: PgPool) {
    let (company_id, contact_id) = seed_contact(&pool, "Acme").await;
    add_appointment(&pool, company_id, "a1", Some(contact_id), Some(1), "cancelled", None).await;
    add_appointment(&pool, company_id, "a2", Some(contact_id), Some(3), "showed", None).await;

    recalculate_contact_flags(&pool, company_id, contact_id).await.unwrap();
    let second = recalculate_contact_flags(&pool, company_id, contact_id).await.unwrap();
    assert_eq!(second.total, 2);
    assert_eq!(second.updated, 0);
    assert_eq!(second.errors, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn all_cancelled_contact_keeps_latest(pool: PgPool) {
    let (company_id, contact_id) = seed_contact(&pool, "Acme").await;
    let a1 = add_appointment(&pool, company_id, "a1", Some(contact_id), Some(1), "cancelled", None)
        .await;
    let a2 = add_appointment(&pool, company_id, "a2", Some(contact_id), Some(3), "cancelled", None)
        .await;
    let a3 = add_appointment(&pool, company_id, "a3", Some(contact_id), Some(5), "cancelled", None)
        .await;

    recalculate_contact_flags(&pool, company_id, contact_id).await.unwrap();

    assert_eq!(flag_of(&pool, a1.id).await, Some(0));
    assert_eq!(flag_of(&pool, a2.id).await, Some(0));
    assert_eq!(flag_of(&pool, a3.id).await, Some(1));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn late_cancellation_shifts_positions(pool: PgPool) {
    let (company_id, contact_id) = seed_contact(&pool, "Acme").await;
    let first =
        add_appointment(&pool, company_id, "a1", Some(contact_id), Some(1), "showed", None).await;
    let second =
        add_appointment(&pool, company_id, "a2", Some(contact_id), Some(3), "scheduled", None)
            .await;

    recalculate_contact_flags(&pool, company_id, contact_id).await.unwrap();
    assert_eq!(flag_of(&pool, first.id).await, Some(1));
    assert_eq!(flag_of(&pool, second.id).await, Some(2));

    // The first appointment gets cancelled after the fact; the second one
    // must slide into position 1.
    add_appointment(&pool, company_id, "a1", Some(contact_id), Some(1), "cancelled", None).await;
    recalculate_contact_flags(&pool, company_id, contact_id).await.unwrap();
    assert_eq!(flag_of(&pool, first.id).await, Some(0));
    assert_eq!(flag_of(&pool, second.id).await, Some(1));
}

// ---------------------------------------------------------------------------
// Bulk sweep
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn bulk_run_scopes_to_company_and_clears_unlinked(pool: PgPool) {
    let (acme_id, acme_contact) = seed_contact(&pool, "Acme").await;
    let (globex_id, globex_contact) = seed_contact(&pool, "Globex").await;

    let acme_appt =
        add_appointment(&pool, acme_id, "a1", Some(acme_contact), Some(1), "showed", None).await;
    let globex_appt =
        add_appointment(&pool, globex_id, "g1", Some(globex_contact), Some(1), "showed", None)
            .await;
    // An orphan row with a stale flag from before its contact link was lost.
    let orphan = add_appointment(&pool, globex_id, "g2", None, Some(2), "showed", None).await;
    AppointmentRepo::set_inclusion_flag(&pool, orphan.id, Some(3)).await.unwrap();

    let scoped = recalculate_all_flags(&pool, Some(acme_id)).await.unwrap();
    assert_eq!(scoped.total, 1);
    assert_eq!(scoped.updated, 1);
    assert_eq!(flag_of(&pool, acme_appt.id).await, Some(1));
    // The other tenant is untouched.
    assert_eq!(flag_of(&pool, globex_appt.id).await, None);
    assert_eq!(flag_of(&pool, orphan.id).await, Some(3));

    let global = recalculate_all_flags(&pool, None).await.unwrap();
    assert_eq!(global.errors, 0);
    assert_eq!(flag_of(&pool, globex_appt.id).await, Some(1));
    assert_eq!(flag_of(&pool, orphan.id).await, None);
    // Acme was already converged, Globex's appointment and the orphan changed.
    assert_eq!(global.updated, 2);
    assert_eq!(global.total, 3);
}
