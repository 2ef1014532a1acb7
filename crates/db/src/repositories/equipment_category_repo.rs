//! Repository for the `equipment_categories` table.

use agrihub_core::pagination::{clamp_page, clamp_page_size, offset};
use agrihub_core::types::DbId;
use sqlx::PgPool;

use crate::models::equipment::{
    CreateEquipmentCategory, EquipmentCategory, UpdateEquipmentCategory,
};
use crate::repositories::Page;

/// Column list for `equipment_categories` queries.
const COLUMNS: &str = "id, name, description, created_at, updated_at";

/// Provides CRUD operations for equipment categories.
pub struct EquipmentCategoryRepo;

impl EquipmentCategoryRepo {
    /// Create a category, returning the full row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateEquipmentCategory,
    ) -> Result<EquipmentCategory, sqlx::Error> {
        let query = format!(
            "INSERT INTO equipment_categories (name, description) \
             VALUES ($1, $2) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EquipmentCategory>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Find a category by id, excluding soft-deleted rows.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<EquipmentCategory>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM equipment_categories WHERE id = $1 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, EquipmentCategory>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List categories alphabetically with optional keyword filter.
    pub async fn list(
        pool: &PgPool,
        keyword: Option<&str>,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<Page<EquipmentCategory>, sqlx::Error> {
        let page = clamp_page(page);
        let page_size = clamp_page_size(page_size);
        let pattern = keyword.map(|k| format!("%{k}%"));

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM equipment_categories \
             WHERE deleted_at IS NULL AND ($1::text IS NULL OR name ILIKE $1)",
        )
        .bind(&pattern)
        .fetch_one(pool)
        .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM equipment_categories \
             WHERE deleted_at IS NULL AND ($1::text IS NULL OR name ILIKE $1) \
             ORDER BY name \
             LIMIT $2 OFFSET $3"
        );
        let items = sqlx::query_as::<_, EquipmentCategory>(&query)
            .bind(&pattern)
            .bind(page_size)
            .bind(offset(page, page_size))
            .fetch_all(pool)
            .await?;

        Ok(Page { items, total })
    }

    /// Update a category; absent fields are left unchanged.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEquipmentCategory,
    ) -> Result<Option<EquipmentCategory>, sqlx::Error> {
        let query = format!(
            "UPDATE equipment_categories SET \
                 name = COALESCE($2, name), \
                 description = COALESCE($3, description), \
                 updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EquipmentCategory>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a category. Returns `true` if a live row was marked.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE equipment_categories SET deleted_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
