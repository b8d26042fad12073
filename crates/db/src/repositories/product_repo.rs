//! Repository for the `products` table.

use sqlx::types::Json;
use sqlx::PgPool;
use vitalis_core::enrichment::ProductKey;
use vitalis_core::types::DbId;

use crate::models::product::{Product, ProductDraft, ProductFilter};

/// Column list for the `products` table.
const COLUMNS: &str = "id, category, slug, label, short_label, hero_image, price, unit, \
    in_stock, bullets, description, ctas, plans_note, show_in_plans, created_at, updated_at";

/// Provides CRUD operations for products.
pub struct ProductRepo;

impl ProductRepo {
    /// Insert a new product. A duplicate `(category, slug)` violates
    /// `uq_products_category_slug`.
    pub async fn create(pool: &PgPool, draft: &ProductDraft) -> Result<Product, sqlx::Error> {
        let query = format!(
            "INSERT INTO products \
                (category, slug, label, short_label, hero_image, price, unit, in_stock, \
                 bullets, description, ctas, plans_note, show_in_plans) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(&draft.category)
            .bind(&draft.slug)
            .bind(&draft.label)
            .bind(&draft.short_label)
            .bind(&draft.hero_image)
            .bind(draft.price)
            .bind(&draft.unit)
            .bind(draft.in_stock)
            .bind(Json(&draft.bullets))
            .bind(&draft.description)
            .bind(Json(&draft.ctas))
            .bind(&draft.plans_note)
            .bind(draft.show_in_plans)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = $1");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a product by its `(category, slug)` identity.
    pub async fn find_by_key(
        pool: &PgPool,
        category: &str,
        slug: &str,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE category = $1 AND slug = $2");
        sqlx::query_as::<_, Product>(&query)
            .bind(category)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Batch lookup for enrichment. Keys without a product are simply absent.
    pub async fn find_by_keys(
        pool: &PgPool,
        keys: &[ProductKey],
    ) -> Result<Vec<Product>, sqlx::Error> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let categories: Vec<String> = keys.iter().map(|k| k.category.clone()).collect();
        let slugs: Vec<String> = keys.iter().map(|k| k.slug.clone()).collect();

        let query = format!(
            "SELECT {COLUMNS} FROM products \
             WHERE (category, slug) IN ( \
                SELECT * FROM UNNEST($1::text[], $2::text[]) \
             ) \
             ORDER BY category, slug"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(&categories)
            .bind(&slugs)
            .fetch_all(pool)
            .await
    }

    /// List products, optionally filtered by category and plan visibility.
    pub async fn list(pool: &PgPool, filter: &ProductFilter) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM products \
             WHERE ($1::text IS NULL OR category = $1) \
               AND ($2::boolean IS NULL OR show_in_plans = $2) \
             ORDER BY category, label, id"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(&filter.category)
            .bind(filter.show_in_plans)
            .fetch_all(pool)
            .await
    }

    /// Overwrite a product with a validated draft.
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        draft: &ProductDraft,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!(
            "UPDATE products SET \
                category = $2, slug = $3, label = $4, short_label = $5, hero_image = $6, \
                price = $7, unit = $8, in_stock = $9, bullets = $10, description = $11, \
                ctas = $12, plans_note = $13, show_in_plans = $14 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .bind(&draft.category)
            .bind(&draft.slug)
            .bind(&draft.label)
            .bind(&draft.short_label)
            .bind(&draft.hero_image)
            .bind(draft.price)
            .bind(&draft.unit)
            .bind(draft.in_stock)
            .bind(Json(&draft.bullets))
            .bind(&draft.description)
            .bind(Json(&draft.ctas))
            .bind(&draft.plans_note)
            .bind(draft.show_in_plans)
            .fetch_optional(pool)
            .await
    }

    /// Hard delete. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
