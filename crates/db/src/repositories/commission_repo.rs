//! Repository for the `commissions` table.

use sqlx::PgPool;

use revops_core::types::DbId;

use crate::models::commission::{Commission, CreateCommission};

/// Column list for commissions queries.
const COLUMNS: &str = "id, company_id, sale_id, closer_id, rate, total_amount, \
    released_amount, release_status, created_at, updated_at";

/// Provides CRUD operations for commissions.
pub struct CommissionRepo;

impl CommissionRepo {
    /// Insert a commission, returning the created row. At most one
    /// commission exists per sale (`uq_commissions_sale`).
    pub async fn create(
        pool: &PgPool,
        company_id: DbId,
        input: &CreateCommission,
    ) -> Result<Commission, sqlx::Error> {
        let query = format!(
            "INSERT INTO commissions
                (company_id, sale_id, closer_id, rate, total_amount, released_amount,
                 release_status)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Commission>(&query)
            .bind(company_id)
            .bind(input.sale_id)
            .bind(input.closer_id)
            .bind(input.rate)
            .bind(input.total_amount)
            .bind(input.released_amount)
            .bind(&input.release_status)
            .fetch_one(pool)
            .await
    }

    /// Find a commission by ID scoped to a company.
    pub async fn find_for_company(
        pool: &PgPool,
        company_id: DbId,
        id: DbId,
    ) -> Result<Option<Commission>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM commissions WHERE company_id = $1 AND id = $2");
        sqlx::query_as::<_, Commission>(&query)
            .bind(company_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the commission derived from a sale, if any.
    pub async fn find_by_sale(
        pool: &PgPool,
        sale_id: DbId,
    ) -> Result<Option<Commission>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM commissions WHERE sale_id = $1");
        sqlx::query_as::<_, Commission>(&query)
            .bind(sale_id)
            .fetch_optional(pool)
            .await
    }

    /// List commissions newest first, optionally for one closer.
    pub async fn list(
        pool: &PgPool,
        company_id: DbId,
        closer_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Commission>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM commissions
             WHERE company_id = $1 AND ($2::BIGINT IS NULL OR closer_id = $2)
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Commission>(&query)
            .bind(company_id)
            .bind(closer_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Complete the payout lifecycle for a commission.
    pub async fn mark_paid(pool: &PgPool, id: DbId) -> Result<Option<Commission>, sqlx::Error> {
        let query = format!(
            "UPDATE commissions SET release_status = 'paid', updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Commission>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
