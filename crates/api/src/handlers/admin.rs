//! Administrative handlers.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use revops_core::types::DbId;
use revops_engine::reconcile::recalculate_all_flags;
use revops_events::PlatformEvent;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body for the bulk recalculation action. An empty body recalculates
/// every tenant.
#[derive(Debug, Default, Deserialize)]
pub struct RecalculateRequest {
    pub company_id: Option<DbId>,
}

/// POST /api/v1/admin/recalculate-flags
///
/// Runs the bulk reconciliation sweep and returns its summary counts.
pub async fn recalculate_flags(
    State(state): State<AppState>,
    Json(input): Json<RecalculateRequest>,
) -> AppResult<impl IntoResponse> {
    let summary = recalculate_all_flags(&state.pool, input.company_id).await?;

    let mut event = PlatformEvent::new("flags.recalculated")
        .with_payload(serde_json::to_value(summary).unwrap_or(serde_json::Value::Null));
    if let Some(company_id) = input.company_id {
        event = event.with_company(company_id);
    }
    state.event_bus.publish(event);

    Ok(Json(DataResponse { data: summary }))
}
