//! PostgreSQL persistence for menus, products and footer pages.
//!
//! Repositories are zero-sized structs taking `&PgPool`; [`PgContentSource`]
//! adapts them to the page resolver's [`vitalis_core::resolution::ContentSource`].

use sqlx::postgres::PgPoolOptions;

pub mod content_source;
pub mod models;
pub mod repositories;

pub use content_source::PgContentSource;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
