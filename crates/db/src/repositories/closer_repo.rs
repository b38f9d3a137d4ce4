//! Repository for the `closers` table.

use sqlx::PgPool;

use revops_core::types::DbId;

use crate::models::closer::{Closer, CreateCloser};

/// Column list for closers queries.
const COLUMNS: &str = "id, company_id, name, email, commission_rate, created_at, updated_at";

/// Provides CRUD operations for sales reps.
pub struct CloserRepo;

impl CloserRepo {
    /// Create a new closer, returning the created row.
    pub async fn create(
        pool: &PgPool,
        company_id: DbId,
        input: &CreateCloser,
    ) -> Result<Closer, sqlx::Error> {
        let query = format!(
            "INSERT INTO closers (company_id, name, email, commission_rate)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Closer>(&query)
            .bind(company_id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(input.commission_rate)
            .fetch_one(pool)
            .await
    }

    /// Find a closer by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Closer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM closers WHERE id = $1");
        sqlx::query_as::<_, Closer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a closer within a company by email, case-insensitively. CRM
    /// events identify the assigned rep by email.
    pub async fn find_by_email(
        pool: &PgPool,
        company_id: DbId,
        email: &str,
    ) -> Result<Option<Closer>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM closers
             WHERE company_id = $1 AND LOWER(email) = LOWER($2)"
        );
        sqlx::query_as::<_, Closer>(&query)
            .bind(company_id)
            .bind(email)
            .fetch_optional(pool)
            .await
    }
}
