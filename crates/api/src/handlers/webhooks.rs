//! Ingestion handlers for CRM and payment-processor webhooks.
//!
//! Signature verification is delegated to the gateway in front of this
//! service; these routes trust the transport layer. Every mutation that
//! can change a contact's appointment sequencing re-runs the
//! reconciliation driver before the response is returned.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use revops_core::appointment::validate_status;
use revops_core::error::CoreError;
use revops_core::payment_matching::validate_payment_amount;
use revops_core::types::{DbId, Timestamp};
use revops_db::models::appointment::UpsertAppointment;
use revops_db::models::contact::UpsertContact;
use revops_db::repositories::{AppointmentRepo, CloserRepo, CompanyRepo, ContactRepo};
use revops_engine::payments::{ingest_payment, PaymentData};
use revops_engine::reconcile::recalculate_contact_flags;
use revops_events::PlatformEvent;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// A CRM appointment event (created / updated / cancelled / rescheduled).
///
/// Sparse by design: the CRM often sends only the fields that changed, so
/// everything except `crm_id` and `status` is optional.
#[derive(Debug, Deserialize)]
pub struct CrmAppointmentEvent {
    /// CRM-side appointment identifier; the upsert key.
    pub crm_id: String,
    /// Identity of the booked contact, when the CRM sends it.
    pub contact: Option<CrmContactIdentity>,
    /// Email of the assigned sales rep.
    pub closer_email: Option<String>,
    pub scheduled_at: Option<Timestamp>,
    pub status: String,
    pub outcome: Option<String>,
    pub cash_collected: Option<f64>,
    pub total_price: Option<f64>,
}

/// Contact identity as carried by CRM events.
#[derive(Debug, Deserialize)]
pub struct CrmContactIdentity {
    pub crm_id: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// POST /api/v1/webhooks/{company_id}/crm/appointments
///
/// Upserts the contact (when identity is present) and the appointment,
/// then re-sequences the affected contact group. If the event moved the
/// appointment to a different contact, the previous group is re-sequenced
/// too. Returns the stored appointment.
pub async fn receive_crm_appointment(
    State(state): State<AppState>,
    Path(company_id): Path<DbId>,
    Json(event): Json<CrmAppointmentEvent>,
) -> AppResult<impl IntoResponse> {
    ensure_company(&state, company_id).await?;

    if event.crm_id.trim().is_empty() {
        return Err(AppError::BadRequest("crm_id must not be empty".into()));
    }
    validate_status(&event.status)?;

    // Upsert contact identity first so the appointment can link to it.
    let contact_id = match &event.contact {
        Some(identity) => {
            let input = UpsertContact {
                full_name: identity.full_name.clone(),
                email: identity.email.clone(),
                phone: identity.phone.clone(),
            };
            let contact =
                ContactRepo::upsert_by_crm_id(&state.pool, company_id, &identity.crm_id, &input)
                    .await?;
            Some(contact.id)
        }
        None => None,
    };

    // The assigned rep is matched by email; an unknown rep never blocks
    // ingestion.
    let closer_email = event
        .closer_email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty());
    let closer_id = match closer_email {
        Some(email) => {
            let closer = CloserRepo::find_by_email(&state.pool, company_id, email).await?;
            if closer.is_none() {
                tracing::warn!(company_id, email, "CRM event names an unknown closer");
            }
            closer.map(|c| c.id)
        }
        None => None,
    };

    // Remember the stored contact link to catch re-links.
    let previous_contact =
        AppointmentRepo::find_by_crm_id(&state.pool, company_id, &event.crm_id)
            .await?
            .and_then(|a| a.contact_id);

    let input = UpsertAppointment {
        contact_id,
        closer_id,
        scheduled_at: event.scheduled_at,
        status: event.status.clone(),
        outcome: event.outcome.clone(),
        cash_collected: event.cash_collected,
        total_price: event.total_price,
    };
    let appointment =
        AppointmentRepo::upsert_by_crm_id(&state.pool, company_id, &event.crm_id, &input).await?;

    if let Some(contact_id) = appointment.contact_id {
        recalculate_contact_flags(&state.pool, company_id, contact_id).await?;
    }
    if let Some(prev) = previous_contact {
        if Some(prev) != appointment.contact_id {
            recalculate_contact_flags(&state.pool, company_id, prev).await?;
        }
    }

    state.event_bus.publish(
        PlatformEvent::new("appointment.received")
            .with_company(company_id)
            .with_source("appointment", appointment.id)
            .with_payload(serde_json::json!({
                "crm_id": appointment.crm_id,
                "status": appointment.status,
            })),
    );

    Ok(Json(DataResponse { data: appointment }))
}

/// POST /api/v1/webhooks/{company_id}/payments
///
/// Runs the payment matcher, persists the sale with its match metadata,
/// and releases a commission when the match lands on a commissionable
/// appointment. Returns the sale plus the optional commission.
pub async fn receive_payment(
    State(state): State<AppState>,
    Path(company_id): Path<DbId>,
    Json(payment): Json<PaymentData>,
) -> AppResult<impl IntoResponse> {
    ensure_company(&state, company_id).await?;
    validate_payment_amount(payment.amount)?;

    let outcome = ingest_payment(&state.pool, company_id, &payment).await?;

    state.event_bus.publish(
        PlatformEvent::new("sale.created")
            .with_company(company_id)
            .with_source("sale", outcome.sale.id)
            .with_payload(serde_json::json!({
                "amount": outcome.sale.amount,
                "matched_by": outcome.sale.matched_by,
            })),
    );
    if let Some(commission) = &outcome.commission {
        state.event_bus.publish(
            PlatformEvent::new("commission.created")
                .with_company(company_id)
                .with_source("commission", commission.id)
                .with_payload(serde_json::json!({
                    "sale_id": commission.sale_id,
                    "release_status": commission.release_status,
                })),
        );
    }

    Ok((StatusCode::CREATED, Json(DataResponse { data: outcome })))
}

/// Reject events addressed to tenants that do not exist.
async fn ensure_company(state: &AppState, company_id: DbId) -> AppResult<()> {
    if CompanyRepo::exists(&state.pool, company_id).await? {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Company",
            id: company_id,
        }))
    }
}
