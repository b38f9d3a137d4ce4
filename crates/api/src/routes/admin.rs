//! Route definitions for administrative actions.

use axum::routing::post;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// POST /recalculate-flags  -> recalculate_flags
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/recalculate-flags", post(admin::recalculate_flags))
}
