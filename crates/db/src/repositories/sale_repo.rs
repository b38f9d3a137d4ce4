//! Repository for the `sales` table.

use sqlx::PgPool;

use revops_core::types::DbId;

use crate::models::sale::{CreateSale, Sale};

/// Column list for sales queries.
const COLUMNS: &str = "id, company_id, appointment_id, amount, customer_email, customer_phone, \
    customer_name, matched_by, match_confidence, manually_matched, match_candidates, \
    external_id, created_at, updated_at";

/// Provides CRUD operations for sales.
pub struct SaleRepo;

impl SaleRepo {
    /// Insert a sale with its match metadata, returning the created row.
    pub async fn create(
        pool: &PgPool,
        company_id: DbId,
        input: &CreateSale,
    ) -> Result<Sale, sqlx::Error> {
        let query = format!(
            "INSERT INTO sales
                (company_id, appointment_id, amount, customer_email, customer_phone,
                 customer_name, matched_by, match_confidence, manually_matched,
                 match_candidates, external_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Sale>(&query)
            .bind(company_id)
            .bind(input.appointment_id)
            .bind(input.amount)
            .bind(&input.customer_email)
            .bind(&input.customer_phone)
            .bind(&input.customer_name)
            .bind(&input.matched_by)
            .bind(input.match_confidence)
            .bind(input.manually_matched)
            .bind(&input.match_candidates)
            .bind(&input.external_id)
            .fetch_one(pool)
            .await
    }

    /// Find a sale by ID scoped to a company.
    pub async fn find_for_company(
        pool: &PgPool,
        company_id: DbId,
        id: DbId,
    ) -> Result<Option<Sale>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sales WHERE company_id = $1 AND id = $2");
        sqlx::query_as::<_, Sale>(&query)
            .bind(company_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List sales newest first. `unmatched_only` restricts to the manual
    /// review queue (no appointment link).
    pub async fn list(
        pool: &PgPool,
        company_id: DbId,
        unmatched_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Sale>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sales
             WHERE company_id = $1 AND ($2 = FALSE OR appointment_id IS NULL)
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Sale>(&query)
            .bind(company_id)
            .bind(unmatched_only)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Resolve a sale to an appointment, recording how. Clears any stored
    /// candidates since the ambiguity is settled.
    pub async fn set_match(
        pool: &PgPool,
        id: DbId,
        appointment_id: DbId,
        matched_by: &str,
        match_confidence: f64,
        manually_matched: bool,
    ) -> Result<Option<Sale>, sqlx::Error> {
        let query = format!(
            "UPDATE sales SET
                appointment_id = $2,
                matched_by = $3,
                match_confidence = $4,
                manually_matched = $5,
                match_candidates = NULL,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Sale>(&query)
            .bind(id)
            .bind(appointment_id)
            .bind(matched_by)
            .bind(match_confidence)
            .bind(manually_matched)
            .fetch_optional(pool)
            .await
    }
}
