//! Repository for the `footer_pages` table.

use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::footer_page::{FooterPage, ReplaceFooterPage};

/// Column list for the `footer_pages` table.
const COLUMNS: &str = "id, name, blocks, is_active, created_at, updated_at";

/// Provides CRUD operations for footer pages, keyed by name.
pub struct FooterPageRepo;

impl FooterPageRepo {
    /// Insert an empty, active page. A duplicate name violates `uq_footer_pages_name`.
    pub async fn create_empty(pool: &PgPool, name: &str) -> Result<FooterPage, sqlx::Error> {
        let query = format!(
            "INSERT INTO footer_pages (name, blocks, is_active) \
             VALUES ($1, '[]'::jsonb, true) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FooterPage>(&query)
            .bind(name)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<FooterPage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM footer_pages WHERE name = $1");
        sqlx::query_as::<_, FooterPage>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// The page as the public site sees it: inactive pages are hidden.
    pub async fn find_active_by_name(
        pool: &PgPool,
        name: &str,
    ) -> Result<Option<FooterPage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM footer_pages \
             WHERE name = $1 AND is_active = true"
        );
        sqlx::query_as::<_, FooterPage>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<FooterPage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM footer_pages ORDER BY name");
        sqlx::query_as::<_, FooterPage>(&query).fetch_all(pool).await
    }

    /// Replace blocks and config wholesale.
    /// Returns `None` if no page with the given name exists.
    pub async fn replace(
        pool: &PgPool,
        name: &str,
        doc: &ReplaceFooterPage,
    ) -> Result<Option<FooterPage>, sqlx::Error> {
        let query = format!(
            "UPDATE footer_pages SET blocks = $2, is_active = $3 \
             WHERE name = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FooterPage>(&query)
            .bind(name)
            .bind(Json(&doc.blocks))
            .bind(doc.config.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Hard delete. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, name: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM footer_pages WHERE name = $1")
            .bind(name)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
