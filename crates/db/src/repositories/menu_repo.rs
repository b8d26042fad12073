//! Repository for the `menus` table.

use sqlx::types::Json;
use sqlx::PgPool;
use vitalis_core::content::MenuLayout;
use vitalis_core::rules::MENU_WRITE_LOCK_ID;
use vitalis_core::types::DbId;

use crate::models::menu::{
    Menu, MenuDraft, MenuSelector, MenuUpdate, RenameCascade, ReorderEntry,
};

/// Column list for the `menus` table.
const COLUMNS: &str = "id, name, slug, show_in_navbar, layout, discover, pro_type_hero, \
    expect_section, banner, show_comparison_tabs, show_video_reviews, sort_order, \
    is_active, created_at, updated_at";

/// Provides CRUD operations for menus and the slug rename cascade.
pub struct MenuRepo;

impl MenuRepo {
    /// Insert a new menu.
    ///
    /// A duplicate active slug fails with the `uq_menus_active_slug` violation.
    pub async fn create(pool: &PgPool, draft: &MenuDraft) -> Result<Menu, sqlx::Error> {
        let query = format!(
            "INSERT INTO menus \
                (name, slug, show_in_navbar, layout, discover, pro_type_hero, expect_section, \
                 banner, show_comparison_tabs, show_video_reviews, sort_order, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Menu>(&query)
            .bind(&draft.name)
            .bind(&draft.slug)
            .bind(draft.show_in_navbar)
            .bind(Json(&draft.layout))
            .bind(Json(&draft.discover))
            .bind(&draft.pro_type_hero)
            .bind(&draft.expect_section)
            .bind(&draft.banner)
            .bind(draft.sections.show_comparison_tabs)
            .bind(draft.sections.show_video_reviews)
            .bind(draft.sort_order)
            .bind(draft.is_active)
            .fetch_one(pool)
            .await
    }

    /// Find a menu by its internal ID, active or not.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Menu>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM menus WHERE id = $1");
        sqlx::query_as::<_, Menu>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the active menu with the given (already slugified) slug.
    pub async fn find_active_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<Menu>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM menus \
             WHERE slug = $1 AND is_active = true \
             ORDER BY sort_order, id \
             LIMIT 1"
        );
        sqlx::query_as::<_, Menu>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Find a menu by id, slug or name.
    ///
    /// Slug and name selectors only match active menus.
    pub async fn find_by_selector(
        pool: &PgPool,
        selector: &MenuSelector,
    ) -> Result<Option<Menu>, sqlx::Error> {
        match selector.normalized() {
            MenuSelector::Id { id } => Self::find_by_id(pool, id).await,
            MenuSelector::Slug { slug } => Self::find_active_by_slug(pool, &slug).await,
            MenuSelector::Name { name } => {
                let query = format!(
                    "SELECT {COLUMNS} FROM menus \
                     WHERE name = $1 AND is_active = true \
                     ORDER BY sort_order, id \
                     LIMIT 1"
                );
                sqlx::query_as::<_, Menu>(&query)
                    .bind(name)
                    .fetch_optional(pool)
                    .await
            }
        }
    }

    /// List menus, optionally including inactive ones.
    pub async fn list(pool: &PgPool, include_inactive: bool) -> Result<Vec<Menu>, sqlx::Error> {
        let query = if include_inactive {
            format!("SELECT {COLUMNS} FROM menus ORDER BY sort_order, id")
        } else {
            format!(
                "SELECT {COLUMNS} FROM menus \
                 WHERE is_active = true \
                 ORDER BY sort_order, id"
            )
        };
        sqlx::query_as::<_, Menu>(&query).fetch_all(pool).await
    }

    /// Active menus flagged for the navbar, in display order.
    pub async fn list_navbar(pool: &PgPool) -> Result<Vec<Menu>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM menus \
             WHERE is_active = true AND show_in_navbar = true \
             ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, Menu>(&query).fetch_all(pool).await
    }

    /// Overwrite a menu with a validated draft.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        draft: &MenuDraft,
    ) -> Result<Option<MenuUpdate>, sqlx::Error> {
        Self::revise(pool, id, |_| Ok::<_, sqlx::Error>(draft.clone())).await
    }

    /// Build a new version of a menu from its current row and save it.
    ///
    /// The row is read `FOR UPDATE` under the menu write lock and handed to
    /// `revise`, so the draft is always built from the latest committed state.
    /// When the slug changes, every active menu's treatment hrefs are
    /// rewritten in the same transaction. An error from `revise` rolls back.
    /// Returns `None` if no row with the given `id` exists.
    pub async fn revise<F, E>(
        pool: &PgPool,
        id: DbId,
        revise: F,
    ) -> Result<Option<MenuUpdate>, E>
    where
        F: FnOnce(&Menu) -> Result<MenuDraft, E>,
        E: From<sqlx::Error>,
    {
        let mut tx = pool.begin().await?;
        Self::lock_menus(&mut tx).await?;

        let query = format!("SELECT {COLUMNS} FROM menus WHERE id = $1 FOR UPDATE");
        let current = sqlx::query_as::<_, Menu>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(current) = current else {
            return Ok(None);
        };
        let draft = revise(&current)?;
        let old_slug = current.slug;

        let query = format!(
            "UPDATE menus SET \
                name = $2, slug = $3, show_in_navbar = $4, layout = $5, discover = $6, \
                pro_type_hero = $7, expect_section = $8, banner = $9, \
                show_comparison_tabs = $10, show_video_reviews = $11, \
                sort_order = $12, is_active = $13 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let mut menu = sqlx::query_as::<_, Menu>(&query)
            .bind(id)
            .bind(&draft.name)
            .bind(&draft.slug)
            .bind(draft.show_in_navbar)
            .bind(Json(&draft.layout))
            .bind(Json(&draft.discover))
            .bind(&draft.pro_type_hero)
            .bind(&draft.expect_section)
            .bind(&draft.banner)
            .bind(draft.sections.show_comparison_tabs)
            .bind(draft.sections.show_video_reviews)
            .bind(draft.sort_order)
            .bind(draft.is_active)
            .fetch_one(&mut *tx)
            .await?;

        let mut cascade = None;
        if old_slug != menu.slug {
            let summary = Self::cascade_rename(&mut tx, &old_slug, &menu.slug).await?;
            if summary.menus_updated > 0 {
                // The renamed menu may itself link to its old slug.
                let query = format!("SELECT {COLUMNS} FROM menus WHERE id = $1");
                menu = sqlx::query_as::<_, Menu>(&query)
                    .bind(id)
                    .fetch_one(&mut *tx)
                    .await?;
            }
            tracing::info!(
                menu_id = id,
                old_slug = %summary.old_slug,
                new_slug = %summary.new_slug,
                menus_updated = summary.menus_updated,
                hrefs_rewritten = summary.hrefs_rewritten,
                "Menu slug rename cascaded",
            );
            cascade = Some(summary);
        }

        tx.commit().await?;
        Ok(Some(MenuUpdate { menu, cascade }))
    }

    /// Apply a batch of sort orders in one transaction.
    ///
    /// Returns the number of menus that matched a selector. Entries whose
    /// selector matches nothing are skipped.
    pub async fn reorder(pool: &PgPool, entries: &[ReorderEntry]) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        Self::lock_menus(&mut tx).await?;

        let mut matched = 0;
        for entry in entries {
            let result = match entry.selector.normalized() {
                MenuSelector::Id { id } => {
                    sqlx::query("UPDATE menus SET sort_order = $2 WHERE id = $1")
                        .bind(id)
                        .bind(entry.sort_order)
                        .execute(&mut *tx)
                        .await?
                }
                MenuSelector::Slug { slug } => {
                    sqlx::query(
                        "UPDATE menus SET sort_order = $2 \
                         WHERE slug = $1 AND is_active = true",
                    )
                    .bind(slug)
                    .bind(entry.sort_order)
                    .execute(&mut *tx)
                    .await?
                }
                MenuSelector::Name { name } => {
                    sqlx::query(
                        "UPDATE menus SET sort_order = $2 \
                         WHERE name = $1 AND is_active = true",
                    )
                    .bind(name)
                    .bind(entry.sort_order)
                    .execute(&mut *tx)
                    .await?
                }
            };
            matched += result.rows_affected();
        }

        tx.commit().await?;
        Ok(matched)
    }

    /// Deactivate a menu (set is_active = false). Its slug becomes reusable.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE menus SET is_active = false \
             WHERE id = $1 AND is_active = true",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    async fn lock_menus(tx: &mut sqlx::Transaction<'_, sqlx::Postgres>) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(MENU_WRITE_LOCK_ID)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Rewrite the `old` category segment to `new` in every active menu.
    ///
    /// Only menus whose layout actually changed are written back.
    async fn cascade_rename(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        old_slug: &str,
        new_slug: &str,
    ) -> Result<RenameCascade, sqlx::Error> {
        let rows: Vec<(DbId, Json<MenuLayout>)> = sqlx::query_as(
            "SELECT id, layout FROM menus \
             WHERE is_active = true \
             ORDER BY id \
             FOR UPDATE",
        )
        .fetch_all(&mut **tx)
        .await?;

        let mut summary = RenameCascade {
            old_slug: old_slug.to_string(),
            new_slug: new_slug.to_string(),
            menus_updated: 0,
            hrefs_rewritten: 0,
        };

        for (id, Json(mut layout)) in rows {
            let rewritten = layout.rewrite_slug_segment(old_slug, new_slug);
            if rewritten == 0 {
                continue;
            }
            sqlx::query("UPDATE menus SET layout = $2 WHERE id = $1")
                .bind(id)
                .bind(Json(&layout))
                .execute(&mut **tx)
                .await?;
            summary.menus_updated += 1;
            summary.hrefs_rewritten += rewritten;
        }

        Ok(summary)
    }
}
