//! Integration tests for contact/appointment upserts and the queries the
//! reconciliation driver relies on:
//! - Upsert-by-crm-id merge semantics (present overwrites, absent keeps)
//! - Sibling snapshot ordering
//! - Inclusion-flag persistence that only counts real changes
//! - Keyset paging over (company, contact) pairs

use chrono::{Duration, Utc};
use sqlx::PgPool;

use revops_db::models::appointment::{RecordOutcome, UpsertAppointment};
use revops_db::models::contact::UpsertContact;
use revops_db::repositories::{AppointmentRepo, CompanyRepo, ContactRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn upsert_input(contact_id: Option<i64>, status: &str) -> UpsertAppointment {
    UpsertAppointment {
        contact_id,
        closer_id: None,
        scheduled_at: Some(Utc::now() + Duration::days(1)),
        status: status.to_string(),
        outcome: None,
        cash_collected: None,
        total_price: None,
    }
}

// ---------------------------------------------------------------------------
// Contacts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_contact_upsert_merges_identity_fields(pool: PgPool) {
    let company = CompanyRepo::create(&pool, "Acme").await.unwrap();

    let first = ContactRepo::upsert_by_crm_id(
        &pool,
        company.id,
        "crm-1",
        &UpsertContact {
            full_name: Some("John Smith".into()),
            email: Some("john@example.com".into()),
            phone: None,
        },
    )
    .await
    .unwrap();

    // Second event carries the phone but not the email; both must survive.
    let second = ContactRepo::upsert_by_crm_id(
        &pool,
        company.id,
        "crm-1",
        &UpsertContact {
            full_name: None,
            email: None,
            phone: Some("+15550101".into()),
        },
    )
    .await
    .unwrap();

    assert_eq!(second.id, first.id);
    assert_eq!(second.email.as_deref(), Some("john@example.com"));
    assert_eq!(second.phone.as_deref(), Some("+15550101"));
    assert_eq!(second.full_name.as_deref(), Some("John Smith"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_contact_identity_lookups(pool: PgPool) {
    let company = CompanyRepo::create(&pool, "Acme").await.unwrap();
    let contact = ContactRepo::upsert_by_crm_id(
        &pool,
        company.id,
        "crm-1",
        &UpsertContact {
            full_name: Some("Maria de la Cruz".into()),
            email: Some("Maria@Example.com".into()),
            phone: Some("+15550102".into()),
        },
    )
    .await
    .unwrap();

    let by_email = ContactRepo::find_by_email(&pool, company.id, "maria@example.COM")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_email.id, contact.id);

    let by_phone = ContactRepo::find_by_phone(&pool, company.id, "+15550102")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_phone.id, contact.id);

    let by_tokens =
        ContactRepo::find_by_name_tokens(&pool, company.id, &["cruz".to_string()])
            .await
            .unwrap();
    assert_eq!(by_tokens.len(), 1);
    assert_eq!(by_tokens[0].id, contact.id);

    // Other tenants never see the contact.
    let other = CompanyRepo::create(&pool, "Other").await.unwrap();
    assert!(ContactRepo::find_by_email(&pool, other.id, "maria@example.com")
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Appointments
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_appointment_upsert_overwrites_status_and_merges_rest(pool: PgPool) {
    let company = CompanyRepo::create(&pool, "Acme").await.unwrap();
    let contact = ContactRepo::upsert_by_crm_id(
        &pool,
        company.id,
        "crm-c1",
        &UpsertContact::default(),
    )
    .await
    .unwrap();

    let scheduled = Utc::now() + Duration::days(2);
    let created = AppointmentRepo::upsert_by_crm_id(
        &pool,
        company.id,
        "crm-a1",
        &UpsertAppointment {
            contact_id: Some(contact.id),
            closer_id: None,
            scheduled_at: Some(scheduled),
            status: "scheduled".to_string(),
            outcome: None,
            cash_collected: Some(250.0),
            total_price: None,
        },
    )
    .await
    .unwrap();

    // Cancellation event carries only the status change.
    let updated = AppointmentRepo::upsert_by_crm_id(
        &pool,
        company.id,
        "crm-a1",
        &UpsertAppointment {
            contact_id: None,
            closer_id: None,
            scheduled_at: None,
            status: "cancelled".to_string(),
            outcome: None,
            cash_collected: None,
            total_price: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.status, "cancelled");
    assert_eq!(updated.contact_id, Some(contact.id));
    assert_eq!(updated.scheduled_at.unwrap().timestamp(), scheduled.timestamp());
    assert_eq!(updated.cash_collected, Some(250.0));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_record_outcome_updates_present_fields(pool: PgPool) {
    let company = CompanyRepo::create(&pool, "Acme").await.unwrap();
    let appt = AppointmentRepo::upsert_by_crm_id(
        &pool,
        company.id,
        "crm-a1",
        &upsert_input(None, "showed"),
    )
    .await
    .unwrap();

    let updated = AppointmentRepo::record_outcome(
        &pool,
        appt.id,
        &RecordOutcome {
            outcome: Some("signed".into()),
            cash_collected: Some(1500.0),
            total_price: Some(3000.0),
            status: Some("signed".into()),
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.outcome.as_deref(), Some("signed"));
    assert_eq!(updated.cash_collected, Some(1500.0));
    assert_eq!(updated.total_price, Some(3000.0));
    assert_eq!(updated.status, "signed");

    let missing = AppointmentRepo::record_outcome(
        &pool,
        appt.id + 999,
        &RecordOutcome {
            outcome: None,
            cash_collected: None,
            total_price: None,
            status: None,
        },
    )
    .await
    .unwrap();
    assert!(missing.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sibling_snapshot_orders_unscheduled_last(pool: PgPool) {
    let company = CompanyRepo::create(&pool, "Acme").await.unwrap();
    let contact = ContactRepo::upsert_by_crm_id(
        &pool,
        company.id,
        "crm-c1",
        &UpsertContact::default(),
    )
    .await
    .unwrap();

    let base = Utc::now();
    for (crm_id, offset_days) in [("a-late", Some(5)), ("a-none", None), ("a-early", Some(1))] {
        AppointmentRepo::upsert_by_crm_id(
            &pool,
            company.id,
            crm_id,
            &UpsertAppointment {
                contact_id: Some(contact.id),
                closer_id: None,
                scheduled_at: offset_days.map(|d| base + Duration::days(d)),
                status: "scheduled".to_string(),
                outcome: None,
                cash_collected: None,
                total_price: None,
            },
        )
        .await
        .unwrap();
    }

    let siblings = AppointmentRepo::list_by_contact(&pool, company.id, contact.id)
        .await
        .unwrap();
    let crm_ids: Vec<_> = siblings.iter().map(|a| a.crm_id.as_deref().unwrap()).collect();
    assert_eq!(crm_ids, vec!["a-early", "a-late", "a-none"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_inclusion_flag_write_counts_only_changes(pool: PgPool) {
    let company = CompanyRepo::create(&pool, "Acme").await.unwrap();
    let appt = AppointmentRepo::upsert_by_crm_id(
        &pool,
        company.id,
        "crm-a1",
        &upsert_input(None, "scheduled"),
    )
    .await
    .unwrap();
    assert_eq!(appt.inclusion_flag, None);

    assert_eq!(AppointmentRepo::set_inclusion_flag(&pool, appt.id, Some(1)).await.unwrap(), 1);
    // Same value again: no row should change.
    assert_eq!(AppointmentRepo::set_inclusion_flag(&pool, appt.id, Some(1)).await.unwrap(), 0);
    assert_eq!(AppointmentRepo::set_inclusion_flag(&pool, appt.id, None).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unlinked_appointments_lose_their_flags(pool: PgPool) {
    let company = CompanyRepo::create(&pool, "Acme").await.unwrap();
    let appt = AppointmentRepo::upsert_by_crm_id(
        &pool,
        company.id,
        "crm-a1",
        &upsert_input(None, "scheduled"),
    )
    .await
    .unwrap();
    AppointmentRepo::set_inclusion_flag(&pool, appt.id, Some(1)).await.unwrap();

    let cleared = AppointmentRepo::clear_flags_for_unlinked(&pool, Some(company.id))
        .await
        .unwrap();
    assert_eq!(cleared, 1);

    let reloaded = AppointmentRepo::find_by_id(&pool, appt.id).await.unwrap().unwrap();
    assert_eq!(reloaded.inclusion_flag, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_contact_pairs_page_walks_all_pairs(pool: PgPool) {
    let acme = CompanyRepo::create(&pool, "Acme").await.unwrap();
    let globex = CompanyRepo::create(&pool, "Globex").await.unwrap();

    let mut expected = Vec::new();
    for (company, crm) in [(&acme, "c1"), (&acme, "c2"), (&globex, "c3")] {
        let contact = ContactRepo::upsert_by_crm_id(
            &pool,
            company.id,
            crm,
            &UpsertContact::default(),
        )
        .await
        .unwrap();
        AppointmentRepo::upsert_by_crm_id(
            &pool,
            company.id,
            &format!("appt-{crm}"),
            &upsert_input(Some(contact.id), "scheduled"),
        )
        .await
        .unwrap();
        expected.push((company.id, contact.id));
    }
    expected.sort();

    // Page size 1 forces the keyset predicate through every boundary.
    let mut seen = Vec::new();
    let mut after = None;
    loop {
        let page = AppointmentRepo::contact_pairs_page(&pool, None, after, 1)
            .await
            .unwrap();
        match page.last() {
            Some(&last) => {
                seen.extend(page.iter().copied());
                after = Some(last);
            }
            None => break,
        }
    }
    assert_eq!(seen, expected);

    // Tenant-scoped paging only sees that tenant.
    let scoped = AppointmentRepo::contact_pairs_page(&pool, Some(globex.id), None, 10)
        .await
        .unwrap();
    assert_eq!(scoped.len(), 1);
    assert_eq!(scoped[0].0, globex.id);
}
