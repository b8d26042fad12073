//! Product entity model and DTOs.
//!
//! Products are identified by `(category, slug)`, which is exactly the pair a
//! treatment href carries in its first two path segments after the leading
//! one.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use vitalis_core::content::{Bullet, ProductCtas, ProductOffer};
use vitalis_core::enrichment::ProductKey;
use vitalis_core::error::CoreError;
use vitalis_core::rules::{product_identity, validate_pricing, validate_product_label};
use vitalis_core::types::{DbId, Timestamp};

/// A row from the `products` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    pub category: String,
    pub slug: String,
    pub label: String,
    pub short_label: Option<String>,
    pub hero_image: Option<String>,
    pub price: Option<f64>,
    pub unit: Option<String>,
    pub in_stock: bool,
    pub bullets: Json<Vec<Bullet>>,
    pub description: Option<String>,
    pub ctas: Json<ProductCtas>,
    pub plans_note: Option<String>,
    pub show_in_plans: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Product {
    pub fn key(&self) -> ProductKey {
        ProductKey::new(&self.category, &self.slug)
    }

    /// The fields enrichment reads.
    pub fn offer(&self) -> ProductOffer {
        ProductOffer {
            ctas: self.ctas.0.clone(),
            price: self.price,
            unit: self.unit.clone(),
            plans_note: self.plans_note.clone(),
        }
    }

    /// Merge a partial update into this product and validate the result.
    pub fn revise(&self, update: &UpdateProduct) -> Result<ProductDraft, CoreError> {
        let label = update.label.clone().unwrap_or_else(|| self.label.clone());
        validate_product_label(&label)?;
        let category = update.category.as_deref().unwrap_or(&self.category);
        let slug = update.slug.as_deref().unwrap_or(&self.slug);
        let (category, slug) = product_identity(category, Some(slug), &label)?;

        // Absent keeps the current value, an explicit null clears it.
        let price = update.price.unwrap_or(self.price);
        let unit = update.unit.clone().unwrap_or_else(|| self.unit.clone());
        validate_pricing(price, unit.as_deref())?;

        Ok(ProductDraft {
            category,
            slug,
            label,
            short_label: update.short_label.clone().or_else(|| self.short_label.clone()),
            hero_image: update.hero_image.clone().or_else(|| self.hero_image.clone()),
            price,
            unit,
            in_stock: update.in_stock.unwrap_or(self.in_stock),
            bullets: update.bullets.clone().unwrap_or_else(|| self.bullets.0.clone()),
            description: update.description.clone().or_else(|| self.description.clone()),
            ctas: update.ctas.clone().unwrap_or_else(|| self.ctas.0.clone()),
            plans_note: update.plans_note.clone().or_else(|| self.plans_note.clone()),
            show_in_plans: update.show_in_plans.unwrap_or(self.show_in_plans),
        })
    }
}

/// DTO for creating a new product.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProduct {
    pub category: String,
    /// Derived from `label` when omitted.
    pub slug: Option<String>,
    pub label: String,
    pub short_label: Option<String>,
    pub hero_image: Option<String>,
    pub price: Option<f64>,
    pub unit: Option<String>,
    pub in_stock: Option<bool>,
    #[serde(default)]
    pub bullets: Vec<Bullet>,
    pub description: Option<String>,
    #[serde(default)]
    pub ctas: ProductCtas,
    pub plans_note: Option<String>,
    pub show_in_plans: Option<bool>,
}

/// DTO for updating an existing product. Only supplied fields change.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProduct {
    pub category: Option<String>,
    pub slug: Option<String>,
    pub label: Option<String>,
    pub short_label: Option<String>,
    pub hero_image: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub price: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub unit: Option<Option<String>>,
    pub in_stock: Option<bool>,
    pub bullets: Option<Vec<Bullet>>,
    pub description: Option<String>,
    pub ctas: Option<ProductCtas>,
    pub plans_note: Option<String>,
    pub show_in_plans: Option<bool>,
}

/// Distinguishes an explicit JSON `null` (`Some(None)`) from an absent field.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// A fully validated product document.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub category: String,
    pub slug: String,
    pub label: String,
    pub short_label: Option<String>,
    pub hero_image: Option<String>,
    pub price: Option<f64>,
    pub unit: Option<String>,
    pub in_stock: bool,
    pub bullets: Vec<Bullet>,
    pub description: Option<String>,
    pub ctas: ProductCtas,
    pub plans_note: Option<String>,
    pub show_in_plans: bool,
}

impl TryFrom<CreateProduct> for ProductDraft {
    type Error = CoreError;

    fn try_from(input: CreateProduct) -> Result<Self, Self::Error> {
        validate_product_label(&input.label)?;
        let (category, slug) =
            product_identity(&input.category, input.slug.as_deref(), &input.label)?;
        validate_pricing(input.price, input.unit.as_deref())?;

        Ok(ProductDraft {
            category,
            slug,
            label: input.label.trim().to_string(),
            short_label: input.short_label,
            hero_image: input.hero_image,
            price: input.price,
            unit: input.unit,
            in_stock: input.in_stock.unwrap_or(true),
            bullets: input.bullets,
            description: input.description,
            ctas: input.ctas,
            plans_note: input.plans_note,
            show_in_plans: input.show_in_plans.unwrap_or(false),
        })
    }
}

/// Filters for `GET /products`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub show_in_plans: Option<bool>,
}
