//! Handlers for the `/metrics` reporting endpoints.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use revops_core::types::{DbId, Timestamp};
use revops_db::repositories::MetricsRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for the metrics summary.
#[derive(Debug, Deserialize)]
pub struct MetricsParams {
    pub company_id: DbId,
    /// Inclusive lower bound on `scheduled_at` (RFC 3339).
    pub from: Option<Timestamp>,
    /// Inclusive upper bound on `scheduled_at` (RFC 3339).
    pub to: Option<Timestamp>,
}

/// GET /api/v1/metrics/summary?company_id=&from=&to=
///
/// Show/close rates computed over inclusion-flagged appointments only, so
/// superseded duplicates never inflate the numbers.
pub async fn summary(
    State(state): State<AppState>,
    Query(params): Query<MetricsParams>,
) -> AppResult<impl IntoResponse> {
    let summary =
        MetricsRepo::summary(&state.pool, params.company_id, params.from, params.to).await?;
    Ok(Json(DataResponse { data: summary }))
}
