//! Repository for the `companies` table.

use sqlx::PgPool;

use revops_core::types::DbId;

use crate::models::company::Company;

/// Column list for companies queries.
const COLUMNS: &str = "id, name, created_at, updated_at";

/// Provides CRUD operations for tenants.
pub struct CompanyRepo;

impl CompanyRepo {
    /// Create a new company, returning the created row.
    pub async fn create(pool: &PgPool, name: &str) -> Result<Company, sqlx::Error> {
        let query = format!("INSERT INTO companies (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Company>(&query)
            .bind(name)
            .fetch_one(pool)
            .await
    }

    /// Find a company by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Company>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM companies WHERE id = $1");
        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Check tenant existence; webhook routes reject unknown tenants early.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let found: Option<DbId> = sqlx::query_scalar("SELECT id FROM companies WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(found.is_some())
    }
}
