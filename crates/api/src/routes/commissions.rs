//! Route definitions for commissions.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::commissions;
use crate::state::AppState;

/// Routes mounted at `/commissions`.
///
/// ```text
/// GET  /                -> list
/// POST /{id}/mark-paid  -> mark_paid
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(commissions::list))
        .route("/{id}/mark-paid", post(commissions::mark_paid))
}
