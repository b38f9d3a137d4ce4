//! Reporting summary read model.

use serde::Serialize;
use sqlx::FromRow;

/// Raw aggregate row produced by the metrics query.
///
/// Counts respect inclusion flags: `countable` is every appointment with
/// flag >= 1, while `first_calls` also counts NULL-flag rows (legacy data
/// predating flag computation has always counted as a first call).
#[derive(Debug, Clone, FromRow)]
pub struct MetricsRow {
    pub total_appointments: i64,
    pub countable: i64,
    pub first_calls: i64,
    pub shows: i64,
    pub no_shows: i64,
    pub signed: i64,
    pub cash_collected: f64,
    pub revenue: f64,
}

/// The summary returned to dashboards, rates included.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSummary {
    pub total_appointments: i64,
    pub countable: i64,
    pub first_calls: i64,
    pub shows: i64,
    pub no_shows: i64,
    pub signed: i64,
    pub show_rate: f64,
    pub close_rate: f64,
    pub cash_collected: f64,
    pub revenue: f64,
}

impl From<MetricsRow> for MetricsSummary {
    fn from(row: MetricsRow) -> Self {
        let ratio = |num: i64, den: i64| if den > 0 { num as f64 / den as f64 } else { 0.0 };
        MetricsSummary {
            total_appointments: row.total_appointments,
            countable: row.countable,
            first_calls: row.first_calls,
            shows: row.shows,
            no_shows: row.no_shows,
            signed: row.signed,
            show_rate: ratio(row.shows, row.countable),
            close_rate: ratio(row.signed, row.shows),
            cash_collected: row.cash_collected,
            revenue: row.revenue,
        }
    }
}
