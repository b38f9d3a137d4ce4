//! Route definitions for the ingestion webhooks.

use axum::routing::post;
use axum::Router;

use crate::handlers::webhooks;
use crate::state::AppState;

/// Routes mounted at `/webhooks`.
///
/// ```text
/// POST /{company_id}/crm/appointments  -> receive_crm_appointment
/// POST /{company_id}/payments          -> receive_payment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{company_id}/crm/appointments",
            post(webhooks::receive_crm_appointment),
        )
        .route("/{company_id}/payments", post(webhooks::receive_payment))
}
