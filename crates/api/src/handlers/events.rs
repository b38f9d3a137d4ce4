//! Handlers for the `/events` activity feed.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use revops_core::pagination::{clamp_limit, clamp_offset};
use revops_core::types::DbId;
use revops_db::repositories::EventRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for the event feed. `company_id` is optional; without
/// it the feed spans all tenants (operator view).
#[derive(Debug, Deserialize)]
pub struct EventListParams {
    pub company_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/v1/events?company_id=&limit=&offset=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<EventListParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit);
    let offset = clamp_offset(params.offset);

    let events = EventRepo::list_recent(&state.pool, params.company_id, limit, offset).await?;
    Ok(Json(DataResponse { data: events }))
}
