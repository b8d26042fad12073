//! [`ContentSource`] backed by PostgreSQL.

use vitalis_core::content::{ContentPage, MenuPage};
use vitalis_core::enrichment::{ProductCatalog, ProductKey};
use vitalis_core::resolution::{ContentSource, LookupError};

use crate::repositories::{FooterPageRepo, MenuRepo, ProductRepo};
use crate::DbPool;

/// Serves published content to the page resolver.
#[derive(Debug, Clone)]
pub struct PgContentSource {
    pool: DbPool,
}

impl PgContentSource {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl ContentSource for PgContentSource {
    async fn find_menu(&self, slug: &str) -> Result<Option<MenuPage>, LookupError> {
        let menu = MenuRepo::find_active_by_slug(&self.pool, slug)
            .await
            .map_err(lookup_error)?;
        Ok(menu.map(|m| m.to_page()))
    }

    async fn find_offers(&self, keys: &[ProductKey]) -> Result<ProductCatalog, LookupError> {
        let products = ProductRepo::find_by_keys(&self.pool, keys)
            .await
            .map_err(lookup_error)?;
        Ok(products.iter().map(|p| (p.key(), p.offer())).collect())
    }

    async fn find_content_page(&self, name: &str) -> Result<Option<ContentPage>, LookupError> {
        let page = FooterPageRepo::find_active_by_name(&self.pool, name)
            .await
            .map_err(lookup_error)?;
        Ok(page.map(|p| p.to_content()))
    }
}

/// Classify a database error for the resolver's retry loop.
///
/// Connection-level failures, pool exhaustion, serialization failures and
/// deadlocks are worth retrying; everything else is not.
pub fn lookup_error(err: sqlx::Error) -> LookupError {
    if is_transient(&err) {
        LookupError::Transient(err.to_string())
    } else {
        LookupError::Permanent(err.to_string())
    }
}

fn is_transient(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) | sqlx::Error::WorkerCrashed => true,
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| {
            // 08xxx connection exception, 57P01 admin shutdown,
            // 40001 serialization failure, 40P01 deadlock.
            code.starts_with("08") || matches!(code.as_ref(), "57P01" | "40001" | "40P01")
        }),
        _ => false,
    }
}
