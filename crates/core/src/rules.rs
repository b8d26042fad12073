//! Write-time rules for menus, products and footer pages.
//!
//! The repository layer only persists documents that passed through these
//! checks; the HTTP layer maps their [`CoreError::Validation`] to a 400.

use crate::blocks::Block;
use crate::content::{Discover, MenuLayout};
use crate::error::CoreError;
use crate::slug::slugify;

/// PostgreSQL advisory lock ID taken by every menu write transaction.
///
/// Serializes renames so two overlapping cascades cannot interleave their
/// href rewrites.
pub const MENU_WRITE_LOCK_ID: i64 = 582_164_903;

pub const MAX_NAME_LEN: usize = 120;
pub const MAX_LABEL_LEN: usize = 200;

// ---------------------------------------------------------------------------
// Menus
// ---------------------------------------------------------------------------

pub fn validate_menu_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("Menu name is required".into()));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Menu name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Slug for a menu: the explicit slug when given, otherwise derived from `name`.
///
/// Either way the result is slugified and must not be empty.
pub fn menu_slug(name: &str, explicit: Option<&str>) -> Result<String, CoreError> {
    let slug = match explicit {
        Some(slug) => slugify(slug),
        None => slugify(name),
    };
    if slug.is_empty() {
        return Err(CoreError::Validation(format!(
            "Menu '{name}' does not produce a usable slug"
        )));
    }
    Ok(slug)
}

/// Build the discover link of a menu.
///
/// Flat menus must carry a label; their href defaults to `/{slug}`.
/// Categorized menus keep whatever was supplied.
pub fn resolve_discover(
    layout: &MenuLayout,
    slug: &str,
    label: Option<&str>,
    href: Option<&str>,
) -> Result<Discover, CoreError> {
    let label = label.map(str::trim).unwrap_or_default();
    let href = href.map(str::trim).unwrap_or_default();

    if layout.is_categorized() {
        return Ok(Discover {
            label: label.to_string(),
            href: href.to_string(),
        });
    }

    if label.is_empty() {
        return Err(CoreError::Validation(
            "discover.label is required for non-categorized menus".into(),
        ));
    }
    let href = if href.is_empty() {
        format!("/{slug}")
    } else {
        href.to_string()
    };
    Ok(Discover {
        label: label.to_string(),
        href,
    })
}

/// Every treatment needs a label and an href; every category a title.
pub fn validate_layout(layout: &MenuLayout) -> Result<(), CoreError> {
    if let MenuLayout::Categorized { categories } = layout {
        if let Some(i) = categories.iter().position(|c| c.title.trim().is_empty()) {
            return Err(CoreError::Validation(format!(
                "Category {} is missing a title",
                i + 1
            )));
        }
    }
    for treatment in layout.treatments() {
        if treatment.label.trim().is_empty() {
            return Err(CoreError::Validation("Treatment label is required".into()));
        }
        if treatment.label.len() > MAX_LABEL_LEN {
            return Err(CoreError::Validation(format!(
                "Treatment label must be at most {MAX_LABEL_LEN} characters"
            )));
        }
        if !treatment.href.starts_with('/') {
            return Err(CoreError::Validation(format!(
                "Treatment '{}' needs an absolute href",
                treatment.label
            )));
        }
    }
    Ok(())
}

/// The discover href after a rename, if it still pointed at the old slug.
pub fn renamed_discover_href(href: &str, old_slug: &str, new_slug: &str) -> Option<String> {
    (old_slug != new_slug && href == format!("/{old_slug}")).then(|| format!("/{new_slug}"))
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

/// Normalize and check the `(category, slug)` identity of a product.
///
/// When `slug` is absent it is derived from `label`.
pub fn product_identity(
    category: &str,
    slug: Option<&str>,
    label: &str,
) -> Result<(String, String), CoreError> {
    let category = slugify(category);
    if category.is_empty() {
        return Err(CoreError::Validation("Product category is required".into()));
    }
    let slug = slugify(slug.unwrap_or(label));
    if slug.is_empty() {
        return Err(CoreError::Validation("Product slug is required".into()));
    }
    Ok((category, slug))
}

pub fn validate_product_label(label: &str) -> Result<(), CoreError> {
    if label.trim().is_empty() {
        return Err(CoreError::Validation("Product label is required".into()));
    }
    if label.len() > MAX_LABEL_LEN {
        return Err(CoreError::Validation(format!(
            "Product label must be at most {MAX_LABEL_LEN} characters"
        )));
    }
    Ok(())
}

/// Price and unit are optional, but only as a pair.
pub fn validate_pricing(price: Option<f64>, unit: Option<&str>) -> Result<(), CoreError> {
    let unit = unit.map(str::trim).filter(|u| !u.is_empty());
    match (price, unit) {
        (Some(price), Some(_)) if !price.is_finite() || price < 0.0 => Err(
            CoreError::Validation("Product price must be a non-negative number".into()),
        ),
        (Some(_), Some(_)) | (None, None) => Ok(()),
        (Some(_), None) => Err(CoreError::Validation(
            "Product unit is required when a price is set".into(),
        )),
        (None, Some(_)) => Err(CoreError::Validation(
            "Product price is required when a unit is set".into(),
        )),
    }
}

// ---------------------------------------------------------------------------
// Footer pages
// ---------------------------------------------------------------------------

/// Canonical lookup name of a footer page.
pub fn footer_page_name(raw: &str) -> Result<String, CoreError> {
    let name = slugify(raw);
    if name.is_empty() {
        return Err(CoreError::Validation(format!(
            "'{raw}' is not a usable page name"
        )));
    }
    Ok(name)
}

/// Stored blocks must all be of a known type.
pub fn validate_blocks(blocks: &[Block]) -> Result<(), CoreError> {
    match blocks.iter().position(|b| !b.is_known()) {
        Some(i) => Err(CoreError::Validation(format!(
            "Block {} has an unsupported type; expected heading, subheading, paragraph or list",
            i + 1
        ))),
        None => Ok(()),
    }
}
