//! Route definitions for reporting.

use axum::routing::get;
use axum::Router;

use crate::handlers::metrics;
use crate::state::AppState;

/// Routes mounted at `/metrics`.
///
/// ```text
/// GET /summary  -> summary
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/summary", get(metrics::summary))
}
