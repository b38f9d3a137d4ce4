//! Handlers for the `/commissions` resource.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use revops_core::commission::RELEASE_PENDING;
use revops_core::error::CoreError;
use revops_core::pagination::{clamp_limit, clamp_offset};
use revops_core::types::DbId;
use revops_db::repositories::CommissionRepo;
use revops_events::PlatformEvent;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for the commissions list.
#[derive(Debug, Deserialize)]
pub struct CommissionListParams {
    pub company_id: DbId,
    pub closer_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/v1/commissions?company_id=&closer_id=&limit=&offset=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<CommissionListParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit);
    let offset = clamp_offset(params.offset);

    let commissions = CommissionRepo::list(
        &state.pool,
        params.company_id,
        params.closer_id,
        limit,
        offset,
    )
    .await?;

    Ok(Json(DataResponse { data: commissions }))
}

/// Body for the payout action.
#[derive(Debug, Deserialize)]
pub struct MarkPaidRequest {
    pub company_id: DbId,
}

/// POST /api/v1/commissions/{id}/mark-paid
///
/// Completes the payout lifecycle. A commission with nothing released yet
/// cannot be paid out.
pub async fn mark_paid(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<MarkPaidRequest>,
) -> AppResult<impl IntoResponse> {
    let commission = CommissionRepo::find_for_company(&state.pool, input.company_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Commission",
            id,
        }))?;

    if commission.release_status == RELEASE_PENDING {
        return Err(AppError::Core(CoreError::Conflict(
            "commission has no released amount to pay out".into(),
        )));
    }

    let paid = CommissionRepo::mark_paid(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Commission",
            id,
        }))?;

    state.event_bus.publish(
        PlatformEvent::new("commission.paid")
            .with_company(input.company_id)
            .with_source("commission", paid.id)
            .with_payload(serde_json::json!({
                "released_amount": paid.released_amount,
            })),
    );

    Ok(Json(DataResponse { data: paid }))
}
