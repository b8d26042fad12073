//! Page resolution against an in-memory content source.
//!
//! Covers the menu / footer page / not-found branches and the separation of
//! transient failures from authoritative absence.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use assert_matches::assert_matches;
use vitalis_core::blocks::{Block, RenderedBlock};
use vitalis_core::content::{
    Category, ContentPage, Discover, MenuLayout, MenuPage, ProductCta, ProductCtas, ProductOffer,
    SectionFlags, Treatment,
};
use vitalis_core::enrichment::{Listing, ProductCatalog, ProductKey, DEFAULT_PRIMARY_HREF};
use vitalis_core::resolution::{
    ContentSource, LookupError, PageOutcome, PageResolver, PageView, RetryPolicy,
};

// ---------------------------------------------------------------------------
// In-memory source
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MemorySource {
    menus: Vec<MenuPage>,
    offers: Vec<(ProductKey, ProductOffer)>,
    pages: Vec<ContentPage>,
    /// Number of menu lookups that fail transiently before succeeding.
    menu_failures: AtomicU32,
    /// Footer lookups always fail with this error when set.
    footer_error: Option<LookupError>,
    menu_calls: AtomicU32,
    footer_calls: AtomicU32,
    requested_keys: Mutex<Vec<ProductKey>>,
}

impl ContentSource for MemorySource {
    async fn find_menu(&self, slug: &str) -> Result<Option<MenuPage>, LookupError> {
        self.menu_calls.fetch_add(1, Ordering::SeqCst);
        let remaining = self.menu_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.menu_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(LookupError::Transient("connection reset".into()));
        }
        Ok(self.menus.iter().find(|m| m.slug == slug).cloned())
    }

    async fn find_offers(&self, keys: &[ProductKey]) -> Result<ProductCatalog, LookupError> {
        self.requested_keys.lock().unwrap().extend_from_slice(keys);
        Ok(self
            .offers
            .iter()
            .filter(|(key, _)| keys.contains(key))
            .cloned()
            .collect())
    }

    async fn find_content_page(&self, name: &str) -> Result<Option<ContentPage>, LookupError> {
        self.footer_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.footer_error {
            return Err(err.clone());
        }
        Ok(self.pages.iter().find(|p| p.name == name).cloned())
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn treatment(label: &str, href: &str) -> Treatment {
    Treatment {
        label: label.into(),
        href: href.into(),
        ..Default::default()
    }
}

fn menu(id: i64, name: &str, layout: MenuLayout) -> MenuPage {
    let slug = vitalis_core::slug::slugify(name);
    MenuPage {
        id,
        name: name.into(),
        slug: slug.clone(),
        discover: Discover {
            label: name.into(),
            href: format!("/{slug}"),
        },
        layout,
        sections: SectionFlags::from_legacy_title(name),
        pro_type_hero: None,
        expect_section: None,
        banner: None,
    }
}

fn weight_loss_offer() -> ProductOffer {
    ProductOffer {
        ctas: ProductCtas {
            primary: Some(ProductCta {
                label: Some("Start Now".into()),
                href: Some("/checkout/semaglutide".into()),
            }),
            secondary: None,
        },
        price: Some(99.0),
        unit: Some("/mo".into()),
        plans_note: None,
    }
}

fn source() -> MemorySource {
    MemorySource {
        menus: vec![
            menu(
                1,
                "Weight Loss",
                MenuLayout::Flat {
                    treatments: vec![
                        treatment("Semaglutide", "/treatments/weight-loss/semaglutide"),
                        treatment("Coaching", "/treatments/weight-loss/coaching"),
                    ],
                },
            ),
            menu(
                2,
                "Skin+Hair",
                MenuLayout::Categorized {
                    categories: vec![
                        Category {
                            title: "Hair".into(),
                            items: vec![treatment("Finasteride", "/treatments/skin-hair/finasteride")],
                        },
                        Category {
                            title: "Skin".into(),
                            items: vec![treatment("Tretinoin", "/treatments/skin-hair/tretinoin")],
                        },
                    ],
                },
            ),
        ],
        offers: vec![(
            ProductKey::new("weight-loss", "semaglutide"),
            weight_loss_offer(),
        )],
        pages: vec![ContentPage {
            name: "privacy-policy".into(),
            blocks: vec![
                Block::Heading {
                    text: "Privacy Policy".into(),
                },
                Block::Paragraph {
                    text: "We **never** sell data.".into(),
                },
                Block::Unknown,
                Block::List {
                    items: vec!["One".into(), "Two".into()],
                },
            ],
        }],
        ..Default::default()
    }
}

fn fast_retry(attempts: u32) -> RetryPolicy {
    RetryPolicy::new(attempts, Duration::from_millis(1))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn flat_menu_is_enriched() {
    let resolver = PageResolver::new(source());
    let outcome = resolver.resolve("weight-loss").await;

    let view = assert_matches!(outcome, PageOutcome::Found(PageView::Menu(view)) => view);
    assert_eq!(view.title, "Weight Loss");
    assert!(!view.sections.show_comparison_tabs);
    assert!(view.sections.show_video_reviews);

    let treatments = assert_matches!(view.listing, Listing::Flat { treatments } => treatments);
    assert_eq!(treatments.len(), 2);
    assert_eq!(treatments[0].starting_at.as_deref(), Some("$99 /mo"));
    assert_eq!(treatments[0].primary.href, "/checkout/semaglutide");
    assert_eq!(treatments[1].primary.href, DEFAULT_PRIMARY_HREF);
    assert_eq!(treatments[1].secondary.href, "/treatments/weight-loss/coaching");
}

#[tokio::test]
async fn categorized_menu_keeps_its_shape() {
    let resolver = PageResolver::new(source());
    let outcome = resolver.resolve("Skin+Hair").await;

    let view = assert_matches!(outcome, PageOutcome::Found(PageView::Menu(view)) => view);
    assert!(!view.sections.show_video_reviews);
    let categories =
        assert_matches!(view.listing, Listing::Categorized { categories } => categories);
    let titles: Vec<_> = categories.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, ["Hair", "Skin"]);
    assert_eq!(categories[1].items[0].label, "Tretinoin");
}

#[tokio::test]
async fn segment_is_matched_case_insensitively() {
    let resolver = PageResolver::new(source());
    assert_matches!(
        resolver.resolve("WEIGHT LOSS").await,
        PageOutcome::Found(PageView::Menu(_))
    );
}

#[tokio::test]
async fn menu_match_skips_footer_lookup() {
    let resolver = PageResolver::new(source());
    resolver.resolve("weight-loss").await;
    assert_eq!(resolver.source().footer_calls.load(Ordering::SeqCst), 0);
    assert_eq!(
        *resolver.source().requested_keys.lock().unwrap(),
        vec![
            ProductKey::new("weight-loss", "coaching"),
            ProductKey::new("weight-loss", "semaglutide"),
        ]
    );
}

#[tokio::test]
async fn footer_page_renders_blocks_in_order() {
    let resolver = PageResolver::new(source());
    let outcome = resolver.resolve("privacy-policy").await;

    let view = assert_matches!(outcome, PageOutcome::Found(PageView::Content(view)) => view);
    assert_eq!(view.name, "privacy-policy");
    assert_eq!(view.blocks.len(), 3);
    assert_matches!(&view.blocks[0], RenderedBlock::Heading { .. });
    assert_matches!(&view.blocks[2], RenderedBlock::List { items } if items.len() == 2);
    assert!(view.html.contains("<p>We <strong>never</strong> sell data.</p>"));
}

#[tokio::test]
async fn unknown_slug_is_not_found() {
    let resolver = PageResolver::new(source());
    assert_eq!(resolver.resolve("does-not-exist").await, PageOutcome::NotFound);
    assert_eq!(resolver.source().footer_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn empty_segment_is_not_found_without_lookups() {
    let resolver = PageResolver::new(source());
    assert_eq!(resolver.resolve("%%%").await, PageOutcome::NotFound);
    assert_eq!(resolver.source().menu_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn transient_menu_failure_is_retried() {
    let src = source();
    src.menu_failures.store(2, Ordering::SeqCst);
    let resolver = PageResolver::new(src).with_retry(fast_retry(3));

    assert_matches!(
        resolver.resolve("weight-loss").await,
        PageOutcome::Found(PageView::Menu(_))
    );
    assert_eq!(resolver.source().menu_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn exhausted_retries_are_unavailable_not_missing() {
    let src = source();
    src.menu_failures.store(5, Ordering::SeqCst);
    let resolver = PageResolver::new(src).with_retry(fast_retry(2));

    assert_matches!(
        resolver.resolve("weight-loss").await,
        PageOutcome::Unavailable(_)
    );
    assert_eq!(resolver.source().menu_calls.load(Ordering::SeqCst), 2);
    assert_eq!(resolver.source().footer_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn footer_failure_is_unavailable() {
    let src = MemorySource {
        footer_error: Some(LookupError::Permanent("relation missing".into())),
        ..source()
    };
    let resolver = PageResolver::new(src).with_retry(fast_retry(3));

    assert_matches!(
        resolver.resolve("privacy-policy").await,
        PageOutcome::Unavailable(reason) if reason.contains("relation missing")
    );
    // Permanent errors are not retried.
    assert_eq!(resolver.source().footer_calls.load(Ordering::SeqCst), 1);
}
