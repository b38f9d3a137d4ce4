//! Handlers for the `/sales` resource: listing, the manual-review queue,
//! and manual match resolution.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use revops_core::error::CoreError;
use revops_core::pagination::{clamp_limit, clamp_offset};
use revops_core::types::DbId;
use revops_db::repositories::{AppointmentRepo, CommissionRepo, SaleRepo};
use revops_engine::payments::manually_match_sale;
use revops_events::PlatformEvent;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for the sales list.
#[derive(Debug, Deserialize)]
pub struct SaleListParams {
    pub company_id: DbId,
    /// `true` restricts to the manual-review queue (no appointment link).
    #[serde(default)]
    pub unmatched: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/v1/sales?company_id=&unmatched=&limit=&offset=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<SaleListParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit);
    let offset = clamp_offset(params.offset);

    let sales = SaleRepo::list(
        &state.pool,
        params.company_id,
        params.unmatched,
        limit,
        offset,
    )
    .await?;

    Ok(Json(DataResponse { data: sales }))
}

/// Body for the manual match action.
#[derive(Debug, Deserialize)]
pub struct ManualMatchRequest {
    pub company_id: DbId,
    pub appointment_id: DbId,
}

/// POST /api/v1/sales/{id}/match
///
/// Resolves an unmatched or ambiguous sale by hand, creating the
/// commission the automatic path would have created.
pub async fn manual_match(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ManualMatchRequest>,
) -> AppResult<impl IntoResponse> {
    // Verify both ends up front so the caller gets a precise 404.
    SaleRepo::find_for_company(&state.pool, input.company_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Sale", id }))?;
    AppointmentRepo::find_for_company(&state.pool, input.company_id, input.appointment_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Appointment",
            id: input.appointment_id,
        }))?;

    let had_commission = CommissionRepo::find_by_sale(&state.pool, id).await?.is_some();

    let outcome = manually_match_sale(&state.pool, input.company_id, id, input.appointment_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Sale", id }))?;

    state.event_bus.publish(
        PlatformEvent::new("sale.matched")
            .with_company(input.company_id)
            .with_source("sale", outcome.sale.id)
            .with_payload(serde_json::json!({
                "appointment_id": outcome.sale.appointment_id,
                "matched_by": outcome.sale.matched_by,
            })),
    );
    if let Some(commission) = outcome.commission.as_ref().filter(|_| !had_commission) {
        state.event_bus.publish(
            PlatformEvent::new("commission.created")
                .with_company(input.company_id)
                .with_source("commission", commission.id)
                .with_payload(serde_json::json!({
                    "sale_id": commission.sale_id,
                    "release_status": commission.release_status,
                })),
        );
    }

    Ok(Json(DataResponse { data: outcome }))
}
