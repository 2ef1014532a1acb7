//! Repository for the `equipment` table.
//!
//! Plain CRUD only. Stock (`quantity`) is mutated exclusively by the
//! transactional workflows in `equipment_change_repo` and
//! `daily_note_repo`.

use agrihub_core::pagination::{clamp_page, clamp_page_size, offset};
use agrihub_core::types::DbId;
use sqlx::PgPool;

use crate::models::equipment::{CreateEquipment, Equipment, UpdateEquipment};
use crate::repositories::Page;

/// Column list for `equipment` queries.
const COLUMNS: &str =
    "id, farm_id, category_id, name, image, quantity, description, created_at, updated_at";

/// Provides CRUD operations for equipment.
pub struct EquipmentRepo;

impl EquipmentRepo {
    /// Create an equipment row with its initial stock.
    pub async fn create(pool: &PgPool, input: &CreateEquipment) -> Result<Equipment, sqlx::Error> {
        let query = format!(
            "INSERT INTO equipment (farm_id, category_id, name, image, quantity, description) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Equipment>(&query)
            .bind(input.farm_id)
            .bind(input.category_id)
            .bind(&input.name)
            .bind(&input.image)
            .bind(input.quantity)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Find equipment by id, excluding soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Equipment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM equipment WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Equipment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find equipment by id scoped to a farm (ownership check + lookup).
    pub async fn find_for_farm(
        pool: &PgPool,
        id: DbId,
        farm_id: DbId,
    ) -> Result<Option<Equipment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM equipment \
             WHERE id = $1 AND farm_id = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, Equipment>(&query)
            .bind(id)
            .bind(farm_id)
            .fetch_optional(pool)
            .await
    }

    /// List a farm's equipment with optional category and keyword filters.
    pub async fn list_for_farm(
        pool: &PgPool,
        farm_id: DbId,
        category_id: Option<DbId>,
        keyword: Option<&str>,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<Page<Equipment>, sqlx::Error> {
        let page = clamp_page(page);
        let page_size = clamp_page_size(page_size);
        let pattern = keyword.map(|k| format!("%{k}%"));

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM equipment \
             WHERE farm_id = $1 AND deleted_at IS NULL \
               AND ($2::bigint IS NULL OR category_id = $2) \
               AND ($3::text IS NULL OR name ILIKE $3)",
        )
        .bind(farm_id)
        .bind(category_id)
        .bind(&pattern)
        .fetch_one(pool)
        .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM equipment \
             WHERE farm_id = $1 AND deleted_at IS NULL \
               AND ($2::bigint IS NULL OR category_id = $2) \
               AND ($3::text IS NULL OR name ILIKE $3) \
             ORDER BY created_at DESC \
             LIMIT $4 OFFSET $5"
        );
        let items = sqlx::query_as::<_, Equipment>(&query)
            .bind(farm_id)
            .bind(category_id)
            .bind(&pattern)
            .bind(page_size)
            .bind(offset(page, page_size))
            .fetch_all(pool)
            .await?;

        Ok(Page { items, total })
    }

    /// Update descriptive fields; quantity is deliberately untouched.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEquipment,
    ) -> Result<Option<Equipment>, sqlx::Error> {
        let query = format!(
            "UPDATE equipment SET \
                 category_id = COALESCE($2, category_id), \
                 name = COALESCE($3, name), \
                 image = COALESCE($4, image), \
                 description = COALESCE($5, description), \
                 updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Equipment>(&query)
            .bind(id)
            .bind(input.category_id)
            .bind(&input.name)
            .bind(&input.image)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete equipment. Returns `true` if a live row was marked.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE equipment SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
