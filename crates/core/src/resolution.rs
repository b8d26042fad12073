//! Public page resolution.
//!
//! A request for `/{segment}` is resolved by a small one-directional state
//! machine:
//!
//! ```text
//! Loading ──> MenuFound ─────────────────────────────> (render menu)
//!    │
//!    └──────> NoMenuFetchingFooter ──> FooterFound ──> (render blocks)
//!                                  └─> NotFound
//! ```
//!
//! Any lookup that keeps failing transiently after the retry budget, or fails
//! permanently, ends in `Unavailable` instead of `NotFound`, so a flaky
//! database never turns into a false 404.

use std::future::Future;
use std::time::Duration;

use serde::Serialize;

use crate::blocks::{join_html, render_blocks, RenderedBlock};
use crate::content::{ContentPage, Discover, MenuPage, SectionFlags};
use crate::enrichment::{enrich_layout, product_keys, Listing, ProductCatalog, ProductKey};
use crate::slug::slugify;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Content source seam
// ---------------------------------------------------------------------------

/// Failure of a single content lookup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// The store could not answer right now (pool exhausted, connection reset).
    #[error("transient lookup failure: {0}")]
    Transient(String),
    /// The store answered with an error that retrying will not fix.
    #[error("lookup failure: {0}")]
    Permanent(String),
}

impl LookupError {
    pub fn is_transient(&self) -> bool {
        matches!(self, LookupError::Transient(_))
    }
}

/// Read access to published content, implemented by the persistence layer.
pub trait ContentSource: Send + Sync {
    /// The active menu whose slug equals `slug`, if any.
    fn find_menu(
        &self,
        slug: &str,
    ) -> impl Future<Output = Result<Option<MenuPage>, LookupError>> + Send;

    /// Offers for the given product keys. Missing products are simply absent.
    fn find_offers(
        &self,
        keys: &[ProductKey],
    ) -> impl Future<Output = Result<ProductCatalog, LookupError>> + Send;

    /// The active footer page named `name`, if any.
    fn find_content_page(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<ContentPage>, LookupError>> + Send;
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// A menu page ready to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuView {
    pub id: DbId,
    pub slug: String,
    pub title: String,
    pub discover: Discover,
    pub listing: Listing,
    pub sections: SectionFlags,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pro_type_hero: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expect_section: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<serde_json::Value>,
}

impl MenuView {
    pub fn build(menu: MenuPage, catalog: &ProductCatalog) -> Self {
        let listing = enrich_layout(&menu.layout, catalog);
        Self {
            id: menu.id,
            title: menu.title().to_string(),
            slug: menu.slug,
            discover: menu.discover,
            listing,
            sections: menu.sections,
            pro_type_hero: menu.pro_type_hero,
            expect_section: menu.expect_section,
            banner: menu.banner,
        }
    }
}

/// A footer page ready to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentView {
    pub name: String,
    pub blocks: Vec<RenderedBlock>,
    pub html: String,
}

impl From<ContentPage> for ContentView {
    fn from(page: ContentPage) -> Self {
        let blocks = render_blocks(&page.blocks);
        let html = join_html(&blocks);
        Self {
            name: page.name,
            blocks,
            html,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageView {
    Menu(MenuView),
    Content(ContentView),
}

/// Final answer for a page request.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    Found(PageView),
    /// Neither a menu nor a footer page exists for the segment.
    NotFound,
    /// The store could not be consulted; the page may well exist.
    Unavailable(String),
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// Intermediate states of a single resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionState {
    Loading,
    MenuFound(MenuPage),
    NoMenuFetchingFooter,
    FooterFound(ContentPage),
    NotFound,
    Unavailable(String),
}

impl ResolutionState {
    pub fn name(&self) -> &'static str {
        match self {
            ResolutionState::Loading => "loading",
            ResolutionState::MenuFound(_) => "menu_found",
            ResolutionState::NoMenuFetchingFooter => "no_menu_fetching_footer",
            ResolutionState::FooterFound(_) => "footer_found",
            ResolutionState::NotFound => "not_found",
            ResolutionState::Unavailable(_) => "unavailable",
        }
    }
}

/// Bounded retry of transient lookup failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per lookup, including the first. At least 1.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles for every further attempt.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    fn delay_before(&self, attempt: u32) -> Duration {
        // attempt is 2 for the first retry.
        self.backoff
            .saturating_mul(1u32 << attempt.saturating_sub(2).min(16))
    }
}

/// Resolves public page segments against a [`ContentSource`].
#[derive(Debug, Clone)]
pub struct PageResolver<S> {
    source: S,
    retry: RetryPolicy,
}

impl<S: ContentSource> PageResolver<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Resolve `/{segment}` to a page.
    pub async fn resolve(&self, segment: &str) -> PageOutcome {
        let slug = slugify(segment);
        if slug.is_empty() {
            return PageOutcome::NotFound;
        }

        let mut state = ResolutionState::Loading;
        loop {
            let next = self.advance(&slug, state).await;
            tracing::debug!(slug = %slug, state = next.name(), "Page resolution transition");
            state = match next {
                Step::Continue(state) => state,
                Step::Done(outcome) => return outcome,
            };
        }
    }

    async fn advance(&self, slug: &str, state: ResolutionState) -> Step {
        match state {
            ResolutionState::Loading => {
                match self.retrying("menu", || self.source.find_menu(slug)).await {
                    Ok(Some(menu)) => Step::Continue(ResolutionState::MenuFound(menu)),
                    Ok(None) => Step::Continue(ResolutionState::NoMenuFetchingFooter),
                    Err(err) => Step::Continue(ResolutionState::Unavailable(err.to_string())),
                }
            }
            ResolutionState::MenuFound(menu) => {
                let keys = product_keys(&menu.layout);
                let catalog = if keys.is_empty() {
                    Ok(ProductCatalog::new())
                } else {
                    self.retrying("products", || self.source.find_offers(&keys))
                        .await
                };
                match catalog {
                    Ok(catalog) => {
                        Step::Done(PageOutcome::Found(PageView::Menu(MenuView::build(
                            menu, &catalog,
                        ))))
                    }
                    Err(err) => Step::Continue(ResolutionState::Unavailable(err.to_string())),
                }
            }
            ResolutionState::NoMenuFetchingFooter => {
                match self
                    .retrying("footer page", || self.source.find_content_page(slug))
                    .await
                {
                    Ok(Some(page)) => Step::Continue(ResolutionState::FooterFound(page)),
                    Ok(None) => Step::Continue(ResolutionState::NotFound),
                    Err(err) => Step::Continue(ResolutionState::Unavailable(err.to_string())),
                }
            }
            ResolutionState::FooterFound(page) => {
                Step::Done(PageOutcome::Found(PageView::Content(page.into())))
            }
            ResolutionState::NotFound => Step::Done(PageOutcome::NotFound),
            ResolutionState::Unavailable(reason) => Step::Done(PageOutcome::Unavailable(reason)),
        }
    }

    async fn retrying<T, F, Fut>(&self, what: &'static str, mut op: F) -> Result<T, LookupError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, LookupError>>,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < self.retry.max_attempts => {
                    attempt += 1;
                    let delay = self.retry.delay_before(attempt);
                    tracing::warn!(lookup = what, attempt, error = %err, "Retrying content lookup");
                    tokio::time::sleep(delay).await;
                }
                Err(err) => {
                    tracing::error!(lookup = what, attempt, error = %err, "Content lookup failed");
                    return Err(err);
                }
            }
        }
    }
}

enum Step {
    Continue(ResolutionState),
    Done(PageOutcome),
}

impl Step {
    fn name(&self) -> &'static str {
        match self {
            Step::Continue(state) => state.name(),
            Step::Done(PageOutcome::Found(_)) => "rendered",
            Step::Done(PageOutcome::NotFound) => "not_found",
            Step::Done(PageOutcome::Unavailable(_)) => "unavailable",
        }
    }
}
