//! Handlers for the `/appointments` resource.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use revops_core::appointment::validate_status;
use revops_core::error::CoreError;
use revops_core::pagination::{clamp_limit, clamp_offset};
use revops_core::types::DbId;
use revops_db::models::appointment::RecordOutcome;
use revops_db::repositories::AppointmentRepo;
use revops_engine::reconcile::recalculate_contact_flags;
use revops_events::PlatformEvent;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for the appointment list.
#[derive(Debug, Deserialize)]
pub struct AppointmentListParams {
    pub company_id: DbId,
    pub contact_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/v1/appointments?company_id=&contact_id=&limit=&offset=
///
/// Dashboard listing, newest scheduled first.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<AppointmentListParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit);
    let offset = clamp_offset(params.offset);

    let appointments = AppointmentRepo::list(
        &state.pool,
        params.company_id,
        params.contact_id,
        limit,
        offset,
    )
    .await?;

    Ok(Json(DataResponse { data: appointments }))
}

/// PUT /api/v1/appointments/{id}/outcome
///
/// Post-call-note submission: records outcome, collected amounts, and an
/// optional status change, then re-sequences the contact's group.
pub async fn record_outcome(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<RecordOutcome>,
) -> AppResult<impl IntoResponse> {
    if let Some(status) = &input.status {
        validate_status(status)?;
    }

    let appointment = AppointmentRepo::record_outcome(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Appointment",
            id,
        }))?;

    if let Some(contact_id) = appointment.contact_id {
        recalculate_contact_flags(&state.pool, appointment.company_id, contact_id).await?;
    }

    state.event_bus.publish(
        PlatformEvent::new("appointment.outcome_recorded")
            .with_company(appointment.company_id)
            .with_source("appointment", appointment.id)
            .with_payload(serde_json::json!({
                "status": appointment.status,
                "outcome": appointment.outcome,
            })),
    );

    Ok(Json(DataResponse { data: appointment }))
}
