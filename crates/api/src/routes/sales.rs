//! Route definitions for sales.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::sales;
use crate::state::AppState;

/// Routes mounted at `/sales`.
///
/// ```text
/// GET  /            -> list (?unmatched=true is the review queue)
/// POST /{id}/match  -> manual_match
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(sales::list))
        .route("/{id}/match", post(sales::manual_match))
}
