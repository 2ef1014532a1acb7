//! Repository for the `users` table.

use agrihub_core::pagination::{clamp_page, clamp_page_size, offset};
use agrihub_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{UpdateUser, User};
use crate::repositories::Page;

/// Column list for `users` queries.
const COLUMNS: &str = "id, farm_id, username, email, password_hash, full_name, phone, role, \
                       is_active, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a user with an already-hashed password, returning the row.
    pub async fn create(
        pool: &PgPool,
        farm_id: Option<DbId>,
        username: &str,
        email: &str,
        password_hash: &str,
        full_name: &str,
        phone: Option<&str>,
        role: &str,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (farm_id, username, email, password_hash, full_name, phone, role) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(farm_id)
            .bind(username)
            .bind(email)
            .bind(password_hash)
            .bind(full_name)
            .bind(phone)
            .bind(role)
            .fetch_one(pool)
            .await
    }

    /// Find a user by id, excluding soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username (login path).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM users WHERE username = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Find an active user holding a specific role, by id.
    ///
    /// Used by task assignment to confirm the assignee really is a farmer.
    pub async fn find_active_with_role(
        pool: &PgPool,
        id: DbId,
        role: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users \
             WHERE id = $1 AND role = $2 AND is_active = TRUE AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(role)
            .fetch_optional(pool)
            .await
    }

    /// Ids of the active users holding a role within a farm.
    ///
    /// Used by notification routing to fan events out to a farm's managers
    /// or experts.
    pub async fn ids_with_role_for_farm(
        pool: &PgPool,
        farm_id: DbId,
        role: &str,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT id FROM users \
             WHERE farm_id = $1 AND role = $2 AND is_active = TRUE AND deleted_at IS NULL",
        )
        .bind(farm_id)
        .bind(role)
        .fetch_all(pool)
        .await
    }

    /// List users, optionally scoped to a farm, with keyword filter on
    /// username and full name.
    pub async fn list(
        pool: &PgPool,
        farm_id: Option<DbId>,
        keyword: Option<&str>,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<Page<User>, sqlx::Error> {
        let page = clamp_page(page);
        let page_size = clamp_page_size(page_size);
        let pattern = keyword.map(|k| format!("%{k}%"));

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users \
             WHERE deleted_at IS NULL \
               AND ($1::bigint IS NULL OR farm_id = $1) \
               AND ($2::text IS NULL OR username ILIKE $2 OR full_name ILIKE $2)",
        )
        .bind(farm_id)
        .bind(&pattern)
        .fetch_one(pool)
        .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM users \
             WHERE deleted_at IS NULL \
               AND ($1::bigint IS NULL OR farm_id = $1) \
               AND ($2::text IS NULL OR username ILIKE $2 OR full_name ILIKE $2) \
             ORDER BY created_at DESC \
             LIMIT $3 OFFSET $4"
        );
        let items = sqlx::query_as::<_, User>(&query)
            .bind(farm_id)
            .bind(&pattern)
            .bind(page_size)
            .bind(offset(page, page_size))
            .fetch_all(pool)
            .await?;

        Ok(Page { items, total })
    }

    /// Update a user's profile fields; absent fields are left unchanged.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET \
                 farm_id = COALESCE($2, farm_id), \
                 email = COALESCE($3, email), \
                 full_name = COALESCE($4, full_name), \
                 phone = COALESCE($5, phone), \
                 is_active = COALESCE($6, is_active), \
                 updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(input.farm_id)
            .bind(&input.email)
            .bind(&input.full_name)
            .bind(&input.phone)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a user. Returns `true` if a live row was marked.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE users SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
