//! Route definitions for appointments.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::appointments;
use crate::state::AppState;

/// Routes mounted at `/appointments`.
///
/// ```text
/// GET /                 -> list
/// PUT /{id}/outcome     -> record_outcome
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(appointments::list))
        .route("/{id}/outcome", put(appointments::record_outcome))
}
