//! Periodic purge of old platform events.
//!
//! Spawns a background task that deletes rows from `events` older than the
//! configured retention period. Runs on a fixed interval using
//! `tokio::time::interval`.

use std::time::Duration;

use chrono::Utc;
use revops_db::repositories::EventRepo;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// Default retention period: 90 days.
const DEFAULT_RETENTION_DAYS: i64 = 90;

/// How often the cleanup job runs.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(3600); // 1 hour

/// Run the event retention cleanup loop.
///
/// Deletes event rows older than `EVENTS_RETENTION_DAYS` (defaults to 90).
/// Runs until `cancel` is triggered.
pub async fn run(pool: PgPool, cancel: CancellationToken) {
    let retention_days: i64 = std::env::var("EVENTS_RETENTION_DAYS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_RETENTION_DAYS);

    tracing::info!(
        retention_days,
        interval_secs = CLEANUP_INTERVAL.as_secs(),
        "Event retention job started"
    );

    let mut interval = tokio::time::interval(CLEANUP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Event retention job stopping");
                break;
            }
            _ = interval.tick() => {
                let cutoff = Utc::now() - chrono::Duration::days(retention_days);
                match EventRepo::delete_older_than(&pool, cutoff).await {
                    Ok(deleted) => {
                        if deleted > 0 {
                            tracing::info!(deleted, "Event retention: purged old rows");
                        } else {
                            tracing::debug!("Event retention: no rows to purge");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Event retention: cleanup failed");
                    }
                }
            }
        }
    }
}
