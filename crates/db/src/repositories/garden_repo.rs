//! Repository for the `gardens` table.

use agrihub_core::pagination::{clamp_page, clamp_page_size, offset};
use agrihub_core::types::DbId;
use sqlx::PgPool;

use crate::models::garden::{CreateGarden, Garden, UpdateGarden};
use crate::repositories::Page;

/// Column list for `gardens` queries.
const COLUMNS: &str = "id, farm_id, name, area_m2, description, image, created_at, updated_at";

/// Provides CRUD operations for gardens.
pub struct GardenRepo;

impl GardenRepo {
    /// Create a garden, returning the full row.
    pub async fn create(pool: &PgPool, input: &CreateGarden) -> Result<Garden, sqlx::Error> {
        let query = format!(
            "INSERT INTO gardens (farm_id, name, area_m2, description, image) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Garden>(&query)
            .bind(input.farm_id)
            .bind(&input.name)
            .bind(input.area_m2)
            .bind(&input.description)
            .bind(&input.image)
            .fetch_one(pool)
            .await
    }

    /// Find a garden by id, excluding soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Garden>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM gardens WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Garden>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a farm's gardens, newest first, with optional keyword filter.
    pub async fn list_for_farm(
        pool: &PgPool,
        farm_id: DbId,
        keyword: Option<&str>,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<Page<Garden>, sqlx::Error> {
        let page = clamp_page(page);
        let page_size = clamp_page_size(page_size);
        let pattern = keyword.map(|k| format!("%{k}%"));

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM gardens \
             WHERE farm_id = $1 AND deleted_at IS NULL \
               AND ($2::text IS NULL OR name ILIKE $2)",
        )
        .bind(farm_id)
        .bind(&pattern)
        .fetch_one(pool)
        .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM gardens \
             WHERE farm_id = $1 AND deleted_at IS NULL \
               AND ($2::text IS NULL OR name ILIKE $2) \
             ORDER BY created_at DESC \
             LIMIT $3 OFFSET $4"
        );
        let items = sqlx::query_as::<_, Garden>(&query)
            .bind(farm_id)
            .bind(&pattern)
            .bind(page_size)
            .bind(offset(page, page_size))
            .fetch_all(pool)
            .await?;

        Ok(Page { items, total })
    }

    /// Update a garden's fields; absent fields are left unchanged.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateGarden,
    ) -> Result<Option<Garden>, sqlx::Error> {
        let query = format!(
            "UPDATE gardens SET \
                 name = COALESCE($2, name), \
                 area_m2 = COALESCE($3, area_m2), \
                 description = COALESCE($4, description), \
                 image = COALESCE($5, image), \
                 updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Garden>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.area_m2)
            .bind(&input.description)
            .bind(&input.image)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a garden. Returns `true` if a live row was marked.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE gardens SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
