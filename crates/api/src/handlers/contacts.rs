//! Handlers for the `/contacts` resource.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;

use revops_core::error::CoreError;
use revops_core::types::DbId;
use revops_db::repositories::{AppointmentRepo, ContactRepo};

use crate::error::{AppError, AppResult};
use crate::query::CompanyScope;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/contacts/{id}/appointments?company_id=
///
/// The contact's appointment timeline oldest first, inclusion flags
/// included. A contact belonging to a different company reads as absent.
pub async fn list_appointments(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(scope): Query<CompanyScope>,
) -> AppResult<impl IntoResponse> {
    let contact = ContactRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|c| c.company_id == scope.company_id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Contact",
            id,
        }))?;

    let appointments =
        AppointmentRepo::list_by_contact(&state.pool, scope.company_id, contact.id).await?;

    Ok(Json(DataResponse { data: appointments }))
}
