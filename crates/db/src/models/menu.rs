//! Menu entity model and DTOs.
//!
//! A menu is a treatment category page (e.g. "Weight Loss") and doubles as a
//! navbar entry. Its treatments live in the `layout` JSONB document, either
//! flat or grouped into categories.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use vitalis_core::content::{display_title, Discover, MenuLayout, MenuPage, SectionFlags};
use vitalis_core::error::CoreError;
use vitalis_core::rules::{
    menu_slug, renamed_discover_href, resolve_discover, validate_layout, validate_menu_name,
};
use vitalis_core::slug::slugify;
use vitalis_core::types::{DbId, Timestamp};

/// A row from the `menus` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Menu {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub show_in_navbar: bool,
    pub layout: Json<MenuLayout>,
    pub discover: Json<Discover>,
    pub pro_type_hero: Option<serde_json::Value>,
    pub expect_section: Option<serde_json::Value>,
    pub banner: Option<serde_json::Value>,
    pub show_comparison_tabs: bool,
    pub show_video_reviews: bool,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Menu {
    pub fn sections(&self) -> SectionFlags {
        SectionFlags {
            show_comparison_tabs: self.show_comparison_tabs,
            show_video_reviews: self.show_video_reviews,
        }
    }

    /// Read model consumed by the page resolver.
    pub fn to_page(&self) -> MenuPage {
        MenuPage {
            id: self.id,
            name: self.name.clone(),
            slug: self.slug.clone(),
            discover: self.discover.0.clone(),
            layout: self.layout.0.clone(),
            sections: self.sections(),
            pro_type_hero: self.pro_type_hero.clone(),
            expect_section: self.expect_section.clone(),
            banner: self.banner.clone(),
        }
    }

    /// Merge a partial update into this menu and validate the result.
    ///
    /// A new name recomputes the slug unless an explicit slug is supplied.
    /// A discover href that still points at the old slug follows a rename.
    pub fn revise(&self, update: &UpdateMenu) -> Result<MenuDraft, CoreError> {
        let name = update.name.clone().unwrap_or_else(|| self.name.clone());
        validate_menu_name(&name)?;

        let slug = match (&update.slug, &update.name) {
            (Some(explicit), _) => menu_slug(&name, Some(explicit))?,
            (None, Some(_)) => menu_slug(&name, None)?,
            (None, None) => self.slug.clone(),
        };

        let layout = update.layout.clone().unwrap_or_else(|| self.layout.0.clone());
        validate_layout(&layout)?;

        let patch = update.discover.clone().unwrap_or_default();
        let label = patch.label.unwrap_or_else(|| self.discover.label.clone());
        let href = match patch.href {
            Some(href) => href,
            None => renamed_discover_href(&self.discover.href, &self.slug, &slug)
                .unwrap_or_else(|| self.discover.href.clone()),
        };
        let discover = resolve_discover(&layout, &slug, Some(&label), Some(&href))?;

        let current = self.sections();
        let sections = match &update.sections {
            Some(patch) => SectionFlags {
                show_comparison_tabs: patch
                    .show_comparison_tabs
                    .unwrap_or(current.show_comparison_tabs),
                show_video_reviews: patch
                    .show_video_reviews
                    .unwrap_or(current.show_video_reviews),
            },
            None => current,
        };

        Ok(MenuDraft {
            name,
            slug,
            show_in_navbar: update.show_in_navbar.unwrap_or(self.show_in_navbar),
            layout,
            discover,
            pro_type_hero: merge_optional(&update.pro_type_hero, &self.pro_type_hero),
            expect_section: merge_optional(&update.expect_section, &self.expect_section),
            banner: merge_optional(&update.banner, &self.banner),
            sections,
            sort_order: update.sort_order.unwrap_or(self.sort_order),
            is_active: update.is_active.unwrap_or(self.is_active),
        })
    }
}

/// Free-form blocks: absent keeps the current value, JSON `null` clears it.
fn merge_optional(
    patch: &Option<serde_json::Value>,
    current: &Option<serde_json::Value>,
) -> Option<serde_json::Value> {
    match patch {
        Some(serde_json::Value::Null) => None,
        Some(value) => Some(value.clone()),
        None => current.clone(),
    }
}

/// Discover link as submitted; either field may be omitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscoverInput {
    pub label: Option<String>,
    pub href: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SectionFlagsInput {
    pub show_comparison_tabs: Option<bool>,
    pub show_video_reviews: Option<bool>,
}

/// DTO for creating a new menu.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMenu {
    pub name: String,
    pub slug: Option<String>,
    pub show_in_navbar: Option<bool>,
    #[serde(default)]
    pub layout: MenuLayout,
    #[serde(default)]
    pub discover: DiscoverInput,
    pub pro_type_hero: Option<serde_json::Value>,
    pub expect_section: Option<serde_json::Value>,
    pub banner: Option<serde_json::Value>,
    pub sections: Option<SectionFlagsInput>,
    pub sort_order: Option<i32>,
}

/// DTO for updating an existing menu. Only supplied fields change.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMenu {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub show_in_navbar: Option<bool>,
    pub layout: Option<MenuLayout>,
    pub discover: Option<DiscoverInput>,
    #[serde(default, deserialize_with = "nullable")]
    pub pro_type_hero: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "nullable")]
    pub expect_section: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "nullable")]
    pub banner: Option<serde_json::Value>,
    pub sections: Option<SectionFlagsInput>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

/// Keeps an explicit JSON `null` as `Some(Value::Null)` instead of `None`.
fn nullable<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

/// A fully validated menu document, ready to insert or overwrite a row.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuDraft {
    pub name: String,
    pub slug: String,
    pub show_in_navbar: bool,
    pub layout: MenuLayout,
    pub discover: Discover,
    pub pro_type_hero: Option<serde_json::Value>,
    pub expect_section: Option<serde_json::Value>,
    pub banner: Option<serde_json::Value>,
    pub sections: SectionFlags,
    pub sort_order: i32,
    pub is_active: bool,
}

impl TryFrom<CreateMenu> for MenuDraft {
    type Error = CoreError;

    fn try_from(input: CreateMenu) -> Result<Self, Self::Error> {
        validate_menu_name(&input.name)?;
        let name = input.name.trim().to_string();
        let slug = menu_slug(&name, input.slug.as_deref())?;
        validate_layout(&input.layout)?;
        let discover = resolve_discover(
            &input.layout,
            &slug,
            input.discover.label.as_deref(),
            input.discover.href.as_deref(),
        )?;

        // Legacy rules compare against the title the page displays.
        let legacy = SectionFlags::from_legacy_title(display_title(&discover.label, &name));
        let sections = match input.sections {
            Some(flags) => SectionFlags {
                show_comparison_tabs: flags
                    .show_comparison_tabs
                    .unwrap_or(legacy.show_comparison_tabs),
                show_video_reviews: flags
                    .show_video_reviews
                    .unwrap_or(legacy.show_video_reviews),
            },
            None => legacy,
        };

        Ok(MenuDraft {
            name,
            slug,
            show_in_navbar: input.show_in_navbar.unwrap_or(true),
            layout: input.layout,
            discover,
            pro_type_hero: input.pro_type_hero,
            expect_section: input.expect_section,
            banner: input.banner,
            sections,
            sort_order: input.sort_order.unwrap_or(0),
            is_active: true,
        })
    }
}

/// Identifies a menu by id, slug or name. The first field present wins.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MenuSelector {
    Id {
        #[serde(alias = "_id")]
        id: DbId,
    },
    Slug {
        slug: String,
    },
    Name {
        name: String,
    },
}

impl MenuSelector {
    /// Slug selectors are matched in their canonical form.
    pub fn normalized(&self) -> MenuSelector {
        match self {
            MenuSelector::Slug { slug } => MenuSelector::Slug {
                slug: slugify(slug),
            },
            other => other.clone(),
        }
    }

    /// Human readable key for not-found messages.
    pub fn describe(&self) -> String {
        match self {
            MenuSelector::Id { id } => format!("with id {id}"),
            MenuSelector::Slug { slug } => format!("with slug '{slug}'"),
            MenuSelector::Name { name } => format!("named '{name}'"),
        }
    }
}

/// Body of `PATCH /menus`.
#[derive(Debug, Clone, Deserialize)]
pub struct SelectorUpdate {
    pub selector: MenuSelector,
    pub update: UpdateMenu,
}

/// One entry of a bulk reorder.
#[derive(Debug, Clone, Deserialize)]
pub struct ReorderEntry {
    pub selector: MenuSelector,
    pub sort_order: i32,
}

/// Summary of a slug rename propagated across all active menus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameCascade {
    pub old_slug: String,
    pub new_slug: String,
    /// Menus whose layout was rewritten and re-saved.
    pub menus_updated: usize,
    /// Treatment hrefs rewritten across those menus.
    pub hrefs_rewritten: usize,
}

/// Result of a menu update.
#[derive(Debug, Clone, Serialize)]
pub struct MenuUpdate {
    pub menu: Menu,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cascade: Option<RenameCascade>,
}

/// Navbar entry derived from an active menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavbarItem {
    pub id: DbId,
    pub label: String,
    pub slug: String,
    pub href: String,
}

impl From<&Menu> for NavbarItem {
    fn from(menu: &Menu) -> Self {
        let page = menu.to_page();
        Self {
            id: menu.id,
            label: page.title().to_string(),
            slug: menu.slug.clone(),
            href: format!("/{}", menu.slug),
        }
    }
}
