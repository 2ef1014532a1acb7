//! Repository for the `notifications` table.

use agrihub_core::pagination::{clamp_page, clamp_page_size, offset};
use agrihub_core::types::DbId;
use sqlx::PgPool;

use crate::models::notification::Notification;
use crate::repositories::Page;

/// Column list for `notifications` queries.
const COLUMNS: &str = "id, user_id, event_type, title, body, source_entity_type, \
                       source_entity_id, is_read, read_at, created_at";

/// Provides CRUD operations for notifications.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Create a notification for a user, returning the generated ID.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        event_type: &str,
        title: &str,
        body: &str,
        source_entity_type: Option<&str>,
        source_entity_id: Option<DbId>,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO notifications \
                 (user_id, event_type, title, body, source_entity_type, source_entity_id) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id",
        )
        .bind(user_id)
        .bind(event_type)
        .bind(title)
        .bind(body)
        .bind(source_entity_type)
        .bind(source_entity_id)
        .fetch_one(pool)
        .await
    }

    /// List a user's notifications, newest first.
    ///
    /// When `unread_only` is `true`, only unread rows are returned.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        unread_only: bool,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<Page<Notification>, sqlx::Error> {
        let page = clamp_page(page);
        let page_size = clamp_page_size(page_size);
        let filter = if unread_only {
            "AND is_read = false"
        } else {
            ""
        };

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 {filter}"
        ))
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM notifications \
             WHERE user_id = $1 {filter} \
             ORDER BY created_at DESC \
             LIMIT $2 OFFSET $3"
        );
        let items = sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .bind(page_size)
            .bind(offset(page, page_size))
            .fetch_all(pool)
            .await?;

        Ok(Page { items, total })
    }

    /// Mark a single notification as read.
    ///
    /// Returns `true` if the notification was found for the given user and
    /// updated, `false` otherwise.
    pub async fn mark_read(
        pool: &PgPool,
        notification_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications \
             SET is_read = true, read_at = NOW() \
             WHERE id = $1 AND user_id = $2 AND is_read = false",
        )
        .bind(notification_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark all unread notifications as read for a user.
    ///
    /// Returns the number of notifications that were marked read.
    pub async fn mark_all_read(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications \
             SET is_read = true, read_at = NOW() \
             WHERE user_id = $1 AND is_read = false",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Get the number of unread notifications for a user.
    pub async fn unread_count(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = false",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(count.unwrap_or(0))
    }
}
