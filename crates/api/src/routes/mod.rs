pub mod admin;
pub mod appointments;
pub mod commissions;
pub mod contacts;
pub mod events;
pub mod health;
pub mod metrics;
pub mod sales;
pub mod webhooks;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /webhooks/{company_id}/crm/appointments   CRM appointment event (POST)
/// /webhooks/{company_id}/payments           payment event (POST)
///
/// /appointments                             list (GET)
/// /appointments/{id}/outcome                post-call-note submission (PUT)
///
/// /contacts/{id}/appointments               contact timeline with flags (GET)
///
/// /sales                                    list; ?unmatched=true is the review queue (GET)
/// /sales/{id}/match                         manual match resolution (POST)
///
/// /commissions                              list, ?closer_id= filter (GET)
/// /commissions/{id}/mark-paid               payout completion (POST)
///
/// /metrics/summary                          show/close rates, totals (GET)
///
/// /admin/recalculate-flags                  bulk reconciliation sweep (POST)
///
/// /events                                   platform activity feed (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Ingestion front door.
        .nest("/webhooks", webhooks::router())
        // Appointment listing and post-call notes.
        .nest("/appointments", appointments::router())
        // Contact timelines.
        .nest("/contacts", contacts::router())
        // Sales and the manual-review queue.
        .nest("/sales", sales::router())
        // Commission payouts.
        .nest("/commissions", commissions::router())
        // Reporting.
        .nest("/metrics", metrics::router())
        // Operational admin actions.
        .nest("/admin", admin::router())
        // Activity feed.
        .nest("/events", events::router())
}
