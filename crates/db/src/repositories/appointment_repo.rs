//! Repository for the `appointments` table.

use sqlx::PgPool;

use revops_core::appointment::STATUS_SIGNED;
use revops_core::types::{DbId, Timestamp};

use crate::models::appointment::{Appointment, RecordOutcome, UpsertAppointment};

/// Column list for appointments queries.
const COLUMNS: &str = "id, company_id, crm_id, contact_id, closer_id, scheduled_at, status, \
    outcome, inclusion_flag, cash_collected, total_price, created_at, updated_at";

/// Provides CRUD, reconciliation, and matcher-lookup operations for
/// appointments.
pub struct AppointmentRepo;

impl AppointmentRepo {
    /// Insert or update an appointment keyed on `(company_id, crm_id)`.
    ///
    /// `status` always overwrites (every CRM event carries one); the other
    /// fields merge so sparse events never erase stored data.
    pub async fn upsert_by_crm_id(
        pool: &PgPool,
        company_id: DbId,
        crm_id: &str,
        input: &UpsertAppointment,
    ) -> Result<Appointment, sqlx::Error> {
        let query = format!(
            "INSERT INTO appointments
                (company_id, crm_id, contact_id, closer_id, scheduled_at, status, outcome,
                 cash_collected, total_price)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             ON CONFLICT (company_id, crm_id) DO UPDATE SET
                contact_id = COALESCE(EXCLUDED.contact_id, appointments.contact_id),
                closer_id = COALESCE(EXCLUDED.closer_id, appointments.closer_id),
                scheduled_at = COALESCE(EXCLUDED.scheduled_at, appointments.scheduled_at),
                status = EXCLUDED.status,
                outcome = COALESCE(EXCLUDED.outcome, appointments.outcome),
                cash_collected = COALESCE(EXCLUDED.cash_collected, appointments.cash_collected),
                total_price = COALESCE(EXCLUDED.total_price, appointments.total_price),
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Appointment>(&query)
            .bind(company_id)
            .bind(crm_id)
            .bind(input.contact_id)
            .bind(input.closer_id)
            .bind(input.scheduled_at)
            .bind(&input.status)
            .bind(&input.outcome)
            .bind(input.cash_collected)
            .bind(input.total_price)
            .fetch_one(pool)
            .await
    }

    /// Find an appointment by its CRM identifier. Webhook handlers read
    /// the stored row before upserting to detect contact re-links.
    pub async fn find_by_crm_id(
        pool: &PgPool,
        company_id: DbId,
        crm_id: &str,
    ) -> Result<Option<Appointment>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM appointments WHERE company_id = $1 AND crm_id = $2");
        sqlx::query_as::<_, Appointment>(&query)
            .bind(company_id)
            .bind(crm_id)
            .fetch_optional(pool)
            .await
    }

    /// Find an appointment by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Appointment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM appointments WHERE id = $1");
        sqlx::query_as::<_, Appointment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an appointment by ID scoped to a company. Explicit payment
    /// links are verified through this so one tenant's payment can never
    /// resolve to another tenant's appointment.
    pub async fn find_for_company(
        pool: &PgPool,
        company_id: DbId,
        id: DbId,
    ) -> Result<Option<Appointment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM appointments WHERE company_id = $1 AND id = $2");
        sqlx::query_as::<_, Appointment>(&query)
            .bind(company_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Record a post-call-note outcome. Present fields overwrite.
    pub async fn record_outcome(
        pool: &PgPool,
        id: DbId,
        input: &RecordOutcome,
    ) -> Result<Option<Appointment>, sqlx::Error> {
        let query = format!(
            "UPDATE appointments SET
                outcome = COALESCE($2, outcome),
                cash_collected = COALESCE($3, cash_collected),
                total_price = COALESCE($4, total_price),
                status = COALESCE($5, status),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Appointment>(&query)
            .bind(id)
            .bind(&input.outcome)
            .bind(input.cash_collected)
            .bind(input.total_price)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    /// Fetch a contact's full sibling set, the reconciliation snapshot.
    /// Ordered by scheduled_at ascending, unscheduled rows last.
    pub async fn list_by_contact(
        pool: &PgPool,
        company_id: DbId,
        contact_id: DbId,
    ) -> Result<Vec<Appointment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM appointments
             WHERE company_id = $1 AND contact_id = $2
             ORDER BY scheduled_at ASC NULLS LAST, created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Appointment>(&query)
            .bind(company_id)
            .bind(contact_id)
            .fetch_all(pool)
            .await
    }

    /// List appointments for dashboards, newest scheduled first.
    pub async fn list(
        pool: &PgPool,
        company_id: DbId,
        contact_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Appointment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM appointments
             WHERE company_id = $1 AND ($2::BIGINT IS NULL OR contact_id = $2)
             ORDER BY scheduled_at DESC NULLS LAST, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Appointment>(&query)
            .bind(company_id)
            .bind(contact_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Persist a computed inclusion flag. Returns the number of rows
    /// changed (0 when the stored flag already matches, so callers can
    /// count real updates).
    pub async fn set_inclusion_flag(
        pool: &PgPool,
        id: DbId,
        flag: Option<i32>,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE appointments
             SET inclusion_flag = $2, updated_at = NOW()
             WHERE id = $1 AND inclusion_flag IS DISTINCT FROM $2",
        )
        .bind(id)
        .bind(flag)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Null the flags of appointments with no contact link; they cannot be
    /// sequenced. Returns the number of rows changed.
    pub async fn clear_flags_for_unlinked(
        pool: &PgPool,
        company_id: Option<DbId>,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE appointments
             SET inclusion_flag = NULL, updated_at = NOW()
             WHERE contact_id IS NULL
               AND inclusion_flag IS NOT NULL
               AND ($1::BIGINT IS NULL OR company_id = $1)",
        )
        .bind(company_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Page distinct (company_id, contact_id) pairs for bulk recalculation,
    /// keyset-ordered so each page picks up after the previous one.
    pub async fn contact_pairs_page(
        pool: &PgPool,
        company_id: Option<DbId>,
        after: Option<(DbId, DbId)>,
        limit: i64,
    ) -> Result<Vec<(DbId, DbId)>, sqlx::Error> {
        let (after_company, after_contact) = match after {
            Some((c, k)) => (Some(c), Some(k)),
            None => (None, None),
        };
        sqlx::query_as::<_, (DbId, DbId)>(
            "SELECT DISTINCT company_id, contact_id FROM appointments
             WHERE contact_id IS NOT NULL
               AND ($1::BIGINT IS NULL OR company_id = $1)
               AND ($2::BIGINT IS NULL OR (company_id, contact_id) > ($2::BIGINT, $3::BIGINT))
             ORDER BY company_id, contact_id
             LIMIT $4",
        )
        .bind(company_id)
        .bind(after_company)
        .bind(after_contact)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// A contact's most recent signed appointment scheduled on or after
    /// `window_start`. Identity-based payment matching resolves to this.
    pub async fn latest_signed_for_contact(
        pool: &PgPool,
        company_id: DbId,
        contact_id: DbId,
        window_start: Timestamp,
    ) -> Result<Option<Appointment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM appointments
             WHERE company_id = $1 AND contact_id = $2
               AND status = $3 AND scheduled_at >= $4
             ORDER BY scheduled_at DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, Appointment>(&query)
            .bind(company_id)
            .bind(contact_id)
            .bind(STATUS_SIGNED)
            .bind(window_start)
            .fetch_optional(pool)
            .await
    }

    /// Signed appointments for any of the given contacts scheduled on or
    /// after `window_start`; the fuzzy-match candidate pool.
    pub async fn signed_for_contacts(
        pool: &PgPool,
        company_id: DbId,
        contact_ids: &[DbId],
        window_start: Timestamp,
    ) -> Result<Vec<Appointment>, sqlx::Error> {
        if contact_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {COLUMNS} FROM appointments
             WHERE company_id = $1 AND contact_id = ANY($2)
               AND status = $3 AND scheduled_at >= $4
             ORDER BY scheduled_at DESC, id"
        );
        sqlx::query_as::<_, Appointment>(&query)
            .bind(company_id)
            .bind(contact_ids)
            .bind(STATUS_SIGNED)
            .bind(window_start)
            .fetch_all(pool)
            .await
    }
}
