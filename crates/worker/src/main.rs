//! Background worker: periodic inclusion-flag reconciliation sweeps.
//!
//! Per-contact recalculation happens inline on every webhook mutation;
//! this process is the safety net that heals whatever slipped through
//! (crashed requests, manual database edits, legacy rows with no flags).
//! Each sweep walks every contact group and rewrites only flags that
//! actually changed, so an idle sweep is cheap.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use revops_db::DbPool;
use revops_engine::reconcile::recalculate_all_flags;

/// Default seconds between reconciliation sweeps.
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 3600;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "revops_worker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Database ---
    // Schema migrations are owned by the API process; the worker only
    // needs a healthy pool.
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = revops_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");

    revops_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database connection established");

    let interval_secs = std::env::var("RECALC_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS);
    tracing::info!(interval_secs, "Worker starting reconciliation sweeps");

    let cancel = CancellationToken::new();
    let sweeps = tokio::spawn(run_sweeps(pool, interval_secs, cancel.clone()));

    shutdown_signal().await;

    cancel.cancel();
    let _ = sweeps.await;
    tracing::info!("Worker stopped");
}

/// Run reconciliation sweeps until cancelled. The first sweep fires
/// immediately so a fresh deployment heals stale flags without waiting a
/// full interval.
async fn run_sweeps(pool: DbPool, interval_secs: u64, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        tokio::select! {
            () = cancel.cancelled() => {
                tracing::info!("Reconciliation sweeps cancelled");
                break;
            }
            _ = ticker.tick() => {}
        }

        match recalculate_all_flags(&pool, None).await {
            Ok(summary) => {
                tracing::info!(
                    total = summary.total,
                    updated = summary.updated,
                    errors = summary.errors,
                    "Reconciliation sweep finished"
                );
            }
            Err(error) => {
                tracing::error!(%error, "Reconciliation sweep failed");
            }
        }
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the worker
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
