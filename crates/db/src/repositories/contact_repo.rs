//! Repository for the `contacts` table.

use sqlx::PgPool;

use revops_core::types::DbId;

use crate::models::contact::{Contact, UpsertContact};

/// Column list for contacts queries.
const COLUMNS: &str = "id, company_id, crm_id, full_name, email, phone, created_at, updated_at";

/// Provides CRUD and matcher-lookup operations for contacts.
pub struct ContactRepo;

impl ContactRepo {
    /// Insert or update a contact keyed on `(company_id, crm_id)`.
    ///
    /// Present identity fields overwrite; absent ones keep their stored
    /// value, so sparse CRM events never erase known identity data.
    pub async fn upsert_by_crm_id(
        pool: &PgPool,
        company_id: DbId,
        crm_id: &str,
        input: &UpsertContact,
    ) -> Result<Contact, sqlx::Error> {
        let query = format!(
            "INSERT INTO contacts (company_id, crm_id, full_name, email, phone)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (company_id, crm_id) DO UPDATE SET
                full_name = COALESCE(EXCLUDED.full_name, contacts.full_name),
                email = COALESCE(EXCLUDED.email, contacts.email),
                phone = COALESCE(EXCLUDED.phone, contacts.phone),
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contact>(&query)
            .bind(company_id)
            .bind(crm_id)
            .bind(&input.full_name)
            .bind(&input.email)
            .bind(&input.phone)
            .fetch_one(pool)
            .await
    }

    /// Find a contact by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Contact>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contacts WHERE id = $1");
        sqlx::query_as::<_, Contact>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a contact within a company by exact email, case-insensitively.
    pub async fn find_by_email(
        pool: &PgPool,
        company_id: DbId,
        email: &str,
    ) -> Result<Option<Contact>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contacts
             WHERE company_id = $1 AND LOWER(email) = LOWER($2)
             ORDER BY id
             LIMIT 1"
        );
        sqlx::query_as::<_, Contact>(&query)
            .bind(company_id)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Find a contact within a company by exact phone.
    pub async fn find_by_phone(
        pool: &PgPool,
        company_id: DbId,
        phone: &str,
    ) -> Result<Option<Contact>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contacts
             WHERE company_id = $1 AND phone = $2
             ORDER BY id
             LIMIT 1"
        );
        sqlx::query_as::<_, Contact>(&query)
            .bind(company_id)
            .bind(phone)
            .fetch_optional(pool)
            .await
    }

    /// Find contacts whose name contains any of the given tokens,
    /// case-insensitively. Used by the fuzzy payment-match strategy.
    pub async fn find_by_name_tokens(
        pool: &PgPool,
        company_id: DbId,
        tokens: &[String],
    ) -> Result<Vec<Contact>, sqlx::Error> {
        if tokens.is_empty() {
            return Ok(Vec::new());
        }
        let patterns: Vec<String> = tokens.iter().map(|t| format!("%{t}%")).collect();
        let query = format!(
            "SELECT {COLUMNS} FROM contacts
             WHERE company_id = $1 AND full_name ILIKE ANY($2)
             ORDER BY id"
        );
        sqlx::query_as::<_, Contact>(&query)
            .bind(company_id)
            .bind(&patterns)
            .fetch_all(pool)
            .await
    }
}
