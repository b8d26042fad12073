use std::sync::Arc;

use vitalis_core::resolution::PageResolver;
use vitalis_db::PgContentSource;

use crate::cache::SiteCache;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: vitalis_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Navigation snapshot, invalidated by every content write.
    pub site_cache: Arc<SiteCache>,
}

impl AppState {
    pub fn new(pool: vitalis_db::DbPool, config: ServerConfig) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            site_cache: Arc::new(SiteCache::new()),
        }
    }

    /// Page resolver over the live database, using the configured retry policy.
    pub fn resolver(&self) -> PageResolver<PgContentSource> {
        PageResolver::new(PgContentSource::new(self.pool.clone()))
            .with_retry(self.config.retry_policy())
    }
}
