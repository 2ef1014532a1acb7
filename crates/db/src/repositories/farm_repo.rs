//! Repository for the `farms` table.

use agrihub_core::pagination::{clamp_page, clamp_page_size, offset};
use agrihub_core::types::DbId;
use sqlx::PgPool;

use crate::models::farm::{CreateFarm, Farm, UpdateFarm};
use crate::repositories::Page;

/// Column list for `farms` queries.
const COLUMNS: &str = "id, name, address, description, image, created_at, updated_at";

/// Provides CRUD operations for farms.
pub struct FarmRepo;

impl FarmRepo {
    /// Create a farm, returning the full row.
    pub async fn create(pool: &PgPool, input: &CreateFarm) -> Result<Farm, sqlx::Error> {
        let query = format!(
            "INSERT INTO farms (name, address, description, image) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Farm>(&query)
            .bind(&input.name)
            .bind(&input.address)
            .bind(&input.description)
            .bind(&input.image)
            .fetch_one(pool)
            .await
    }

    /// Find a farm by id, excluding soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Farm>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM farms WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Farm>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List farms, newest first, with optional keyword filter on the name.
    pub async fn list(
        pool: &PgPool,
        keyword: Option<&str>,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<Page<Farm>, sqlx::Error> {
        let page = clamp_page(page);
        let page_size = clamp_page_size(page_size);
        let pattern = keyword.map(|k| format!("%{k}%"));

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM farms \
             WHERE deleted_at IS NULL AND ($1::text IS NULL OR name ILIKE $1)",
        )
        .bind(&pattern)
        .fetch_one(pool)
        .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM farms \
             WHERE deleted_at IS NULL AND ($1::text IS NULL OR name ILIKE $1) \
             ORDER BY created_at DESC \
             LIMIT $2 OFFSET $3"
        );
        let items = sqlx::query_as::<_, Farm>(&query)
            .bind(&pattern)
            .bind(page_size)
            .bind(offset(page, page_size))
            .fetch_all(pool)
            .await?;

        Ok(Page { items, total })
    }

    /// Update a farm's fields; absent fields are left unchanged.
    ///
    /// Returns `None` when the farm does not exist or is soft-deleted.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateFarm,
    ) -> Result<Option<Farm>, sqlx::Error> {
        let query = format!(
            "UPDATE farms SET \
                 name = COALESCE($2, name), \
                 address = COALESCE($3, address), \
                 description = COALESCE($4, description), \
                 image = COALESCE($5, image), \
                 updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Farm>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.address)
            .bind(&input.description)
            .bind(&input.image)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a farm. Returns `true` if a live row was marked.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE farms SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
