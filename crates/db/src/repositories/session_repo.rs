//! Repository for the `sessions` table (refresh tokens).

use agrihub_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::session::Session;

/// Column list for `sessions` queries.
const COLUMNS: &str = "id, user_id, refresh_token_hash, expires_at, revoked_at, created_at";

/// Provides storage for refresh-token sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Record a new session, returning its id.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        refresh_token_hash: &str,
        expires_at: Timestamp,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO sessions (user_id, refresh_token_hash, expires_at) \
             VALUES ($1, $2, $3) \
             RETURNING id",
        )
        .bind(user_id)
        .bind(refresh_token_hash)
        .bind(expires_at)
        .fetch_one(pool)
        .await
    }

    /// Find a live (unrevoked, unexpired) session by token hash.
    pub async fn find_live_by_hash(
        pool: &PgPool,
        refresh_token_hash: &str,
    ) -> Result<Option<Session>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sessions \
             WHERE refresh_token_hash = $1 AND revoked_at IS NULL AND expires_at > NOW()"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(refresh_token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Revoke a session by token hash. Returns `true` if one was revoked.
    pub async fn revoke_by_hash(
        pool: &PgPool,
        refresh_token_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sessions SET revoked_at = NOW() \
             WHERE refresh_token_hash = $1 AND revoked_at IS NULL",
        )
        .bind(refresh_token_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Revoke every live session of a user (logout-everywhere, deactivation).
    pub async fn revoke_all_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sessions SET revoked_at = NOW() \
             WHERE user_id = $1 AND revoked_at IS NULL",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
