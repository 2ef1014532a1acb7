//! Repository for the `news` table.

use agrihub_core::pagination::{clamp_page, clamp_page_size, offset};
use agrihub_core::types::DbId;
use sqlx::PgPool;

use crate::models::news::{CreateNews, News, UpdateNews};
use crate::repositories::Page;

/// Column list for `news` queries.
const COLUMNS: &str = "id, title, content, image, published_by, created_at, updated_at";

/// Provides CRUD operations for news items.
pub struct NewsRepo;

impl NewsRepo {
    /// Publish a news item.
    pub async fn create(
        pool: &PgPool,
        published_by: DbId,
        input: &CreateNews,
    ) -> Result<News, sqlx::Error> {
        let query = format!(
            "INSERT INTO news (title, content, image, published_by) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, News>(&query)
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.image)
            .bind(published_by)
            .fetch_one(pool)
            .await
    }

    /// Find a news item by id, excluding soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<News>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM news WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, News>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List news, newest first, with keyword match on the title.
    pub async fn list(
        pool: &PgPool,
        keyword: Option<&str>,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<Page<News>, sqlx::Error> {
        let page = clamp_page(page);
        let page_size = clamp_page_size(page_size);
        let pattern = keyword.map(|k| format!("%{k}%"));

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM news \
             WHERE deleted_at IS NULL AND ($1::text IS NULL OR title ILIKE $1)",
        )
        .bind(&pattern)
        .fetch_one(pool)
        .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM news \
             WHERE deleted_at IS NULL AND ($1::text IS NULL OR title ILIKE $1) \
             ORDER BY created_at DESC \
             LIMIT $2 OFFSET $3"
        );
        let items = sqlx::query_as::<_, News>(&query)
            .bind(&pattern)
            .bind(page_size)
            .bind(offset(page, page_size))
            .fetch_all(pool)
            .await?;

        Ok(Page { items, total })
    }

    /// Update a news item; absent fields are left unchanged.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateNews,
    ) -> Result<Option<News>, sqlx::Error> {
        let query = format!(
            "UPDATE news SET \
                 title = COALESCE($2, title), \
                 content = COALESCE($3, content), \
                 image = COALESCE($4, image), \
                 updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, News>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.image)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a news item. Returns `true` if a live row was marked.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE news SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
