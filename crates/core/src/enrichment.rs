//! Product enrichment of menu treatments.
//!
//! A treatment href has the shape `/{base}/{category}/{slug}`. The
//! `(category, slug)` pair addresses a product whose calls-to-action and
//! price decorate the treatment at render time. Enrichment never mutates
//! its input and never persists its output.

use std::collections::HashMap;

use serde::Serialize;

use crate::content::{Category, MenuLayout, ProductCta, ProductOffer, Treatment};

/// Default label of the primary call-to-action.
pub const DEFAULT_PRIMARY_LABEL: &str = "Get Started";

/// Default target of the primary call-to-action, used by every page.
pub const DEFAULT_PRIMARY_HREF: &str = "/getstarted";

/// Default label of the secondary call-to-action.
pub const DEFAULT_SECONDARY_LABEL: &str = "Learn More";

/// Composite product identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ProductKey {
    pub category: String,
    pub slug: String,
}

impl ProductKey {
    pub fn new(category: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            slug: slug.into(),
        }
    }

    /// Parse `/{base}/{category}/{slug}` out of a treatment href.
    ///
    /// Empty segments are discarded; missing positions become empty strings.
    pub fn from_href(href: &str) -> Self {
        let mut segments = href.split('/').filter(|s| !s.is_empty()).skip(1);
        let category = segments.next().unwrap_or_default();
        let slug = segments.next().unwrap_or_default();
        Self::new(category, slug)
    }

    /// Whether both halves are present, i.e. the key can name a product.
    pub fn is_complete(&self) -> bool {
        !self.category.is_empty() && !self.slug.is_empty()
    }
}

/// A resolved call-to-action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub label: String,
    pub href: String,
}

impl Link {
    fn resolve(cta: Option<&ProductCta>, default_label: &str, default_href: &str) -> Self {
        let label = cta.and_then(|c| c.label.clone());
        let href = cta.and_then(|c| c.href.clone());
        Self {
            label: label.unwrap_or_else(|| default_label.to_string()),
            href: href.unwrap_or_else(|| default_href.to_string()),
        }
    }
}

/// A treatment merged with its product's calls-to-action and price.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedTreatment {
    pub label: String,
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    pub primary: Link,
    pub secondary: Link,
    pub plans_note: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starting_at: Option<String>,
}

/// Decorate `treatment` with the product `lookup` finds for its href.
///
/// `lookup` is only consulted when the href yields both a category and a
/// slug. Every field falls back to a literal default when no product exists.
pub fn enrich<'a, F>(treatment: &Treatment, lookup: F) -> EnrichedTreatment
where
    F: Fn(&ProductKey) -> Option<&'a ProductOffer>,
{
    let key = ProductKey::from_href(&treatment.href);
    let product = if key.is_complete() { lookup(&key) } else { None };
    let ctas = product.map(|p| &p.ctas);

    let primary = Link::resolve(
        ctas.and_then(|c| c.primary.as_ref()),
        DEFAULT_PRIMARY_LABEL,
        DEFAULT_PRIMARY_HREF,
    );
    let secondary = Link::resolve(
        ctas.and_then(|c| c.secondary.as_ref()),
        DEFAULT_SECONDARY_LABEL,
        &treatment.href,
    );
    let plans_note = product
        .and_then(|p| p.plans_note.clone())
        .unwrap_or_default();
    let starting_at = product
        .and_then(ProductOffer::price_label)
        .or_else(|| treatment.starting_at.clone());

    EnrichedTreatment {
        label: treatment.label.clone(),
        href: treatment.href.clone(),
        image: treatment.image.clone(),
        badge: treatment.badge.clone(),
        primary,
        secondary,
        plans_note,
        starting_at,
    }
}

/// Offers fetched for one render, keyed by `(category, slug)`.
#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    offers: HashMap<ProductKey, ProductOffer>,
}

impl ProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: ProductKey, offer: ProductOffer) {
        self.offers.insert(key, offer);
    }

    pub fn get(&self, key: &ProductKey) -> Option<&ProductOffer> {
        self.offers.get(key)
    }

    pub fn len(&self) -> usize {
        self.offers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }

    /// Enrich one treatment against this catalog.
    pub fn enrich(&self, treatment: &Treatment) -> EnrichedTreatment {
        enrich(treatment, |key| self.get(key))
    }
}

impl FromIterator<(ProductKey, ProductOffer)> for ProductCatalog {
    fn from_iter<I: IntoIterator<Item = (ProductKey, ProductOffer)>>(iter: I) -> Self {
        Self {
            offers: iter.into_iter().collect(),
        }
    }
}

/// Distinct, complete product keys referenced by a layout, sorted.
pub fn product_keys(layout: &MenuLayout) -> Vec<ProductKey> {
    let mut keys: Vec<ProductKey> = layout
        .treatments()
        .map(|t| ProductKey::from_href(&t.href))
        .filter(ProductKey::is_complete)
        .collect();
    keys.sort();
    keys.dedup();
    keys
}

/// A category whose items have been enriched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedCategory {
    pub title: String,
    pub items: Vec<EnrichedTreatment>,
}

/// Enriched listing of a menu, mirroring its layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Listing {
    Flat {
        treatments: Vec<EnrichedTreatment>,
    },
    Categorized {
        categories: Vec<EnrichedCategory>,
    },
}

/// Enrich every treatment of `layout`, keeping its shape and order.
pub fn enrich_layout(layout: &MenuLayout, catalog: &ProductCatalog) -> Listing {
    match layout {
        MenuLayout::Flat { treatments } => Listing::Flat {
            treatments: treatments.iter().map(|t| catalog.enrich(t)).collect(),
        },
        MenuLayout::Categorized { categories } => Listing::Categorized {
            categories: categories
                .iter()
                .map(|Category { title, items }| EnrichedCategory {
                    title: title.clone(),
                    items: items.iter().map(|t| catalog.enrich(t)).collect(),
                })
                .collect(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ProductCtas;
    use std::cell::Cell;

    fn treatment(href: &str) -> Treatment {
        Treatment {
            label: "Semaglutide".into(),
            href: href.into(),
            image: Some("/img/sema.png".into()),
            badge: Some("Popular".into()),
            starting_at: None,
        }
    }

    fn priced_offer() -> ProductOffer {
        ProductOffer {
            ctas: ProductCtas {
                primary: Some(ProductCta {
                    label: Some("Start Now".into()),
                    href: Some("/checkout/sema".into()),
                }),
                secondary: Some(ProductCta {
                    label: Some("Details".into()),
                    href: None,
                }),
            },
            price: Some(99.0),
            unit: Some("/mo".into()),
            plans_note: Some("Billed monthly".into()),
        }
    }

    // -- ProductKey ----------------------------------------------------------

    #[test]
    fn key_from_full_href() {
        assert_eq!(
            ProductKey::from_href("/treatments/weight-loss/semaglutide"),
            ProductKey::new("weight-loss", "semaglutide")
        );
    }

    #[test]
    fn key_ignores_empty_segments() {
        assert_eq!(
            ProductKey::from_href("//treatments//weight-loss/semaglutide/"),
            ProductKey::new("weight-loss", "semaglutide")
        );
    }

    #[test]
    fn key_from_short_href_is_incomplete() {
        let key = ProductKey::from_href("/weight-loss");
        assert_eq!(key, ProductKey::new("", ""));
        assert!(!key.is_complete());
        assert!(!ProductKey::from_href("/t/weight-loss").is_complete());
    }

    // -- enrich --------------------------------------------------------------

    #[test]
    fn enrich_with_priced_product() {
        let offer = priced_offer();
        let t = treatment("/treatments/weight-loss/semaglutide");
        let enriched = enrich(&t, |key| {
            (key == &ProductKey::new("weight-loss", "semaglutide")).then_some(&offer)
        });

        assert_eq!(enriched.starting_at.as_deref(), Some("$99 /mo"));
        assert_eq!(
            enriched.primary,
            Link {
                label: "Start Now".into(),
                href: "/checkout/sema".into()
            }
        );
        // Secondary label from the product, href falls back to the treatment.
        assert_eq!(enriched.secondary.label, "Details");
        assert_eq!(enriched.secondary.href, t.href);
        assert_eq!(enriched.plans_note, "Billed monthly");
        assert_eq!(enriched.badge.as_deref(), Some("Popular"));
    }

    #[test]
    fn enrich_without_product_uses_defaults() {
        let mut t = treatment("/treatments/weight-loss/unknown");
        t.starting_at = Some("$50 /mo".into());
        let enriched = enrich(&t, |_| None);

        assert_eq!(
            enriched.primary,
            Link {
                label: DEFAULT_PRIMARY_LABEL.into(),
                href: DEFAULT_PRIMARY_HREF.into()
            }
        );
        assert_eq!(enriched.secondary.href, t.href);
        assert_eq!(enriched.secondary.label, DEFAULT_SECONDARY_LABEL);
        assert_eq!(enriched.plans_note, "");
        assert_eq!(enriched.starting_at.as_deref(), Some("$50 /mo"));
    }

    #[test]
    fn enrich_skips_lookup_for_short_href() {
        let calls = Cell::new(0);
        let t = treatment("/weight-loss");
        let enriched = enrich(&t, |_| {
            calls.set(calls.get() + 1);
            None
        });
        assert_eq!(calls.get(), 0);
        assert_eq!(enriched.primary.href, DEFAULT_PRIMARY_HREF);
    }

    #[test]
    fn enrich_keeps_existing_price_when_product_has_no_unit() {
        let mut offer = priced_offer();
        offer.unit = None;
        let mut t = treatment("/t/c/s");
        t.starting_at = Some("From $30".into());
        let enriched = enrich(&t, |_| Some(&offer));
        assert_eq!(enriched.starting_at.as_deref(), Some("From $30"));
    }

    #[test]
    fn enrich_does_not_mutate_input() {
        let offer = priced_offer();
        let t = treatment("/t/c/s");
        let before = t.clone();
        let _ = enrich(&t, |_| Some(&offer));
        assert_eq!(t, before);
    }

    // -- catalog and layouts -------------------------------------------------

    #[test]
    fn product_keys_are_distinct_and_complete() {
        let layout = MenuLayout::Flat {
            treatments: vec![
                treatment("/t/b/2"),
                treatment("/t/a/1"),
                treatment("/t/b/2"),
                treatment("/short"),
            ],
        };
        assert_eq!(
            product_keys(&layout),
            vec![ProductKey::new("a", "1"), ProductKey::new("b", "2")]
        );
    }

    #[test]
    fn enrich_layout_keeps_categories() {
        let catalog: ProductCatalog =
            [(ProductKey::new("hair", "fin"), priced_offer())].into_iter().collect();
        let layout = MenuLayout::Categorized {
            categories: vec![
                Category {
                    title: "Hair".into(),
                    items: vec![treatment("/t/hair/fin"), treatment("/t/hair/other")],
                },
                Category {
                    title: "Skin".into(),
                    items: vec![],
                },
            ],
        };

        match enrich_layout(&layout, &catalog) {
            Listing::Categorized { categories } => {
                assert_eq!(categories.len(), 2);
                assert_eq!(categories[0].title, "Hair");
                assert_eq!(categories[0].items[0].starting_at.as_deref(), Some("$99 /mo"));
                assert_eq!(categories[0].items[1].primary.href, DEFAULT_PRIMARY_HREF);
                assert!(categories[1].items.is_empty());
            }
            other => panic!("expected categorized listing, got {other:?}"),
        }
    }

    #[test]
    fn enrich_layout_flat() {
        let catalog = ProductCatalog::new();
        let layout = MenuLayout::Flat {
            treatments: vec![treatment("/t/a/b")],
        };
        assert!(matches!(
            enrich_layout(&layout, &catalog),
            Listing::Flat { treatments } if treatments.len() == 1
        ));
    }
}
