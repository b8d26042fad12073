//! Cached site navigation snapshot.
//!
//! The navbar, the plan cards and the footer links change only when an admin
//! edits content, so they are loaded once and served from memory until the
//! next write invalidates them. Page resolution is never cached.

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use vitalis_core::types::Timestamp;
use vitalis_db::models::menu::NavbarItem;
use vitalis_db::models::product::{Product, ProductFilter};
use vitalis_db::repositories::{FooterPageRepo, MenuRepo, ProductRepo};
use vitalis_db::DbPool;

/// Product summary shown on the plans section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanCard {
    pub category: String,
    pub slug: String,
    pub label: String,
    pub short_label: Option<String>,
    pub hero_image: Option<String>,
    pub starting_at: Option<String>,
    pub plans_note: String,
    pub in_stock: bool,
}

impl From<&Product> for PlanCard {
    fn from(product: &Product) -> Self {
        let offer = product.offer();
        Self {
            category: product.category.clone(),
            slug: product.slug.clone(),
            label: product.label.clone(),
            short_label: product.short_label.clone(),
            hero_image: product.hero_image.clone(),
            starting_at: offer.price_label(),
            plans_note: offer.plans_note.unwrap_or_default(),
            in_stock: product.in_stock,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FooterLink {
    pub name: String,
    pub href: String,
}

/// Everything the site chrome needs, captured at one point in time.
#[derive(Debug, Clone, Serialize)]
pub struct SiteSnapshot {
    pub navbar: Vec<NavbarItem>,
    pub plans: Vec<PlanCard>,
    pub footer: Vec<FooterLink>,
    pub generated_at: Timestamp,
}

impl SiteSnapshot {
    pub async fn load(pool: &DbPool) -> Result<Self, sqlx::Error> {
        let navbar = MenuRepo::list_navbar(pool).await?;
        let plans = ProductRepo::list(
            pool,
            &ProductFilter {
                show_in_plans: Some(true),
                ..Default::default()
            },
        )
        .await?;
        let footer = FooterPageRepo::list(pool).await?;

        Ok(Self {
            navbar: navbar.iter().map(NavbarItem::from).collect(),
            plans: plans.iter().map(PlanCard::from).collect(),
            footer: footer
                .into_iter()
                .filter(|page| page.config.is_active)
                .map(|page| FooterLink {
                    href: format!("/{}", page.name),
                    name: page.name,
                })
                .collect(),
            generated_at: chrono::Utc::now(),
        })
    }
}

/// Lazily filled, explicitly invalidated holder of the current snapshot.
#[derive(Debug, Default)]
pub struct SiteCache {
    inner: RwLock<Option<Arc<SiteSnapshot>>>,
}

impl SiteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached snapshot, loading it with `load` on a miss.
    ///
    /// The write lock is held while loading, so concurrent misses load once
    /// and an invalidation cannot be overtaken by a load that started earlier.
    pub async fn get_or_load<F, Fut, E>(&self, load: F) -> Result<Arc<SiteSnapshot>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<SiteSnapshot, E>>,
    {
        if let Some(snapshot) = self.inner.read().await.as_ref() {
            return Ok(Arc::clone(snapshot));
        }

        let mut guard = self.inner.write().await;
        if let Some(snapshot) = guard.as_ref() {
            return Ok(Arc::clone(snapshot));
        }
        let snapshot = Arc::new(load().await?);
        *guard = Some(Arc::clone(&snapshot));
        tracing::debug!("Site snapshot loaded");
        Ok(snapshot)
    }

    /// Drop the cached snapshot; the next read reloads it.
    pub async fn invalidate(&self) {
        if self.inner.write().await.take().is_some() {
            tracing::debug!("Site snapshot invalidated");
        }
    }

    pub async fn is_warm(&self) -> bool {
        self.inner.read().await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn snapshot() -> SiteSnapshot {
        SiteSnapshot {
            navbar: vec![],
            plans: vec![],
            footer: vec![],
            generated_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn loads_once_until_invalidated() {
        let cache = SiteCache::new();
        let counter = AtomicU32::new(0);
        let loads = &counter;
        let load = move || async move {
            loads.fetch_add(1, Ordering::SeqCst);
            Ok::<_, ()>(snapshot())
        };

        assert!(!cache.is_warm().await);
        let first = cache.get_or_load(load).await.unwrap();
        let second = cache.get_or_load(load).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loads.load(Ordering::SeqCst), 1);

        cache.invalidate().await;
        assert!(!cache.is_warm().await);
        cache.get_or_load(load).await.unwrap();
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_load_is_not_cached() {
        let cache = SiteCache::new();
        let result = cache
            .get_or_load(|| async { Err::<SiteSnapshot, _>("db down") })
            .await;
        assert_eq!(result.unwrap_err(), "db down");
        assert!(!cache.is_warm().await);
    }
}
