//! Content vocabulary shared by menus, products and footer pages.
//!
//! These are the document shapes stored in JSONB columns and the read models
//! handed to the page resolver. Nothing here performs I/O.

use serde::{Deserialize, Serialize};

use crate::blocks::Block;
use crate::slug::replace_category_segment;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Menus
// ---------------------------------------------------------------------------

/// The "discover" call-to-action shown at the top of a menu page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Discover {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub href: String,
}

/// One navigable entry in a menu, optionally backed by a product record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Treatment {
    pub label: String,
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    /// Pre-computed price label, used when no product supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_at: Option<String>,
}

/// A titled group of treatments inside a categorized menu.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub title: String,
    #[serde(default)]
    pub items: Vec<Treatment>,
}

/// Shape of a menu's listing: a flat treatment list or titled categories.
///
/// Serialized with a `type` tag so the stored document reads
/// `{"type": "flat", "treatments": [...]}` or
/// `{"type": "categorized", "categories": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MenuLayout {
    Flat {
        #[serde(default)]
        treatments: Vec<Treatment>,
    },
    Categorized {
        #[serde(default)]
        categories: Vec<Category>,
    },
}

impl Default for MenuLayout {
    fn default() -> Self {
        Self::Flat {
            treatments: Vec::new(),
        }
    }
}

impl MenuLayout {
    pub fn is_categorized(&self) -> bool {
        matches!(self, Self::Categorized { .. })
    }

    /// Iterate every treatment regardless of layout, in display order.
    pub fn treatments(&self) -> Box<dyn Iterator<Item = &Treatment> + '_> {
        match self {
            Self::Flat { treatments } => Box::new(treatments.iter()),
            Self::Categorized { categories } => {
                Box::new(categories.iter().flat_map(|c| c.items.iter()))
            }
        }
    }

    fn treatments_mut(&mut self) -> Box<dyn Iterator<Item = &mut Treatment> + '_> {
        match self {
            Self::Flat { treatments } => Box::new(treatments.iter_mut()),
            Self::Categorized { categories } => {
                Box::new(categories.iter_mut().flat_map(|c| c.items.iter_mut()))
            }
        }
    }

    /// Rewrite the category segment of every treatment href from `old` to `new`.
    ///
    /// Returns the number of hrefs that changed.
    pub fn rewrite_slug_segment(&mut self, old: &str, new: &str) -> usize {
        let mut changed = 0;
        for treatment in self.treatments_mut() {
            if let Some(href) = replace_category_segment(&treatment.href, old, new) {
                treatment.href = href;
                changed += 1;
            }
        }
        changed
    }
}

/// Per-menu switches for optional page sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionFlags {
    pub show_comparison_tabs: bool,
    pub show_video_reviews: bool,
}

impl Default for SectionFlags {
    fn default() -> Self {
        Self {
            show_comparison_tabs: true,
            show_video_reviews: true,
        }
    }
}

/// Titles whose pages never showed the comparison tabs section.
const NO_COMPARISON_TABS: &[&str] = &["Weight Loss"];

/// Titles whose pages never showed the video testimonial section.
const NO_VIDEO_REVIEWS: &[&str] = &["Erectile Dysfunction", "Skin+Hair"];

impl SectionFlags {
    /// Flags matching the historical title-based suppression rules.
    ///
    /// Exact, case-sensitive comparison so existing content renders the same.
    pub fn from_legacy_title(title: &str) -> Self {
        Self {
            show_comparison_tabs: !NO_COMPARISON_TABS.contains(&title),
            show_video_reviews: !NO_VIDEO_REVIEWS.contains(&title),
        }
    }
}

/// Read model of an active menu, as consumed by the page resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuPage {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub discover: Discover,
    pub layout: MenuLayout,
    pub sections: SectionFlags,
    pub pro_type_hero: Option<serde_json::Value>,
    pub expect_section: Option<serde_json::Value>,
    pub banner: Option<serde_json::Value>,
}

impl MenuPage {
    /// Display title: the discover label, or the menu name when it is blank.
    pub fn title(&self) -> &str {
        display_title(&self.discover.label, &self.name)
    }
}

/// The discover label, or `name` when the label is blank.
pub fn display_title<'a>(label: &'a str, name: &'a str) -> &'a str {
    let label = label.trim();
    if label.is_empty() {
        name
    } else {
        label
    }
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

/// A product call-to-action as stored; either field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductCta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductCtas {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<ProductCta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<ProductCta>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    #[serde(default)]
    pub icon: String,
    pub text: String,
}

/// The slice of a product that enrichment needs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductOffer {
    pub ctas: ProductCtas,
    pub price: Option<f64>,
    pub unit: Option<String>,
    pub plans_note: Option<String>,
}

impl ProductOffer {
    /// `"$<price> <unit>"` when both price and a non-empty unit are set.
    pub fn price_label(&self) -> Option<String> {
        let price = self.price?;
        let unit = self.unit.as_deref().map(str::trim).filter(|u| !u.is_empty())?;
        Some(format!("${price} {unit}"))
    }
}

// ---------------------------------------------------------------------------
// Footer pages
// ---------------------------------------------------------------------------

/// Read model of an active footer page.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentPage {
    pub name: String,
    pub blocks: Vec<Block>,
}
