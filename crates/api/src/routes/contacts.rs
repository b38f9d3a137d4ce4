//! Route definitions for contacts.

use axum::routing::get;
use axum::Router;

use crate::handlers::contacts;
use crate::state::AppState;

/// Routes mounted at `/contacts`.
///
/// ```text
/// GET /{id}/appointments  -> list_appointments
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}/appointments", get(contacts::list_appointments))
}
