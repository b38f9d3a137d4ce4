//! Aggregate reporting queries.

use sqlx::PgPool;

use revops_core::appointment::{SHOWED_STATUSES, STATUS_NO_SHOW, STATUS_SIGNED};
use revops_core::types::{DbId, Timestamp};

use crate::models::metrics::{MetricsRow, MetricsSummary};

/// Provides the dashboard summary read model.
pub struct MetricsRepo;

impl MetricsRepo {
    /// Aggregate appointment metrics for a company, optionally restricted
    /// to a `scheduled_at` range.
    ///
    /// All show/no-show/signed counts respect inclusion flags so superseded
    /// duplicates never inflate rates; `first_calls` additionally counts
    /// NULL-flag rows (legacy data predates flag computation).
    pub async fn summary(
        pool: &PgPool,
        company_id: DbId,
        from: Option<Timestamp>,
        to: Option<Timestamp>,
    ) -> Result<MetricsSummary, sqlx::Error> {
        let showed: Vec<String> = SHOWED_STATUSES.iter().map(|s| s.to_string()).collect();
        let row = sqlx::query_as::<_, MetricsRow>(
            "SELECT
                COUNT(*) AS total_appointments,
                COUNT(*) FILTER (WHERE inclusion_flag >= 1) AS countable,
                COUNT(*) FILTER (WHERE inclusion_flag = 1 OR inclusion_flag IS NULL)
                    AS first_calls,
                COUNT(*) FILTER (WHERE inclusion_flag >= 1 AND status = ANY($4)) AS shows,
                COUNT(*) FILTER (WHERE inclusion_flag >= 1 AND status = $5) AS no_shows,
                COUNT(*) FILTER (WHERE inclusion_flag >= 1 AND status = $6) AS signed,
                COALESCE(SUM(cash_collected) FILTER (WHERE inclusion_flag >= 1), 0)
                    AS cash_collected,
                COALESCE(SUM(total_price) FILTER (WHERE inclusion_flag >= 1), 0) AS revenue
             FROM appointments
             WHERE company_id = $1
               AND ($2::TIMESTAMPTZ IS NULL OR scheduled_at >= $2)
               AND ($3::TIMESTAMPTZ IS NULL OR scheduled_at <= $3)",
        )
        .bind(company_id)
        .bind(from)
        .bind(to)
        .bind(&showed)
        .bind(STATUS_NO_SHOW)
        .bind(STATUS_SIGNED)
        .fetch_one(pool)
        .await?;
        Ok(row.into())
    }
}
