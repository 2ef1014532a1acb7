//! Repository for the `expert_farms` link table.

use agrihub_core::types::DbId;
use sqlx::PgPool;

use crate::models::expert_farm::ExpertFarm;

/// Manages which farms an expert advises.
pub struct ExpertFarmRepo;

impl ExpertFarmRepo {
    /// Link an expert to a farm. Conflicting links are ignored.
    pub async fn link(pool: &PgPool, expert_id: DbId, farm_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO expert_farms (expert_id, farm_id) VALUES ($1, $2) \
             ON CONFLICT (expert_id, farm_id) DO NOTHING",
        )
        .bind(expert_id)
        .bind(farm_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Remove an expert-farm link. Returns `true` if one existed.
    pub async fn unlink(pool: &PgPool, expert_id: DbId, farm_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM expert_farms WHERE expert_id = $1 AND farm_id = $2")
            .bind(expert_id)
            .bind(farm_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// All links for an expert.
    pub async fn list_for_expert(
        pool: &PgPool,
        expert_id: DbId,
    ) -> Result<Vec<ExpertFarm>, sqlx::Error> {
        sqlx::query_as::<_, ExpertFarm>(
            "SELECT id, expert_id, farm_id, created_at \
             FROM expert_farms WHERE expert_id = $1 ORDER BY created_at",
        )
        .bind(expert_id)
        .fetch_all(pool)
        .await
    }

    /// Ids of the experts advising a farm.
    pub async fn expert_ids_for_farm(
        pool: &PgPool,
        farm_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT expert_id FROM expert_farms WHERE farm_id = $1")
            .bind(farm_id)
            .fetch_all(pool)
            .await
    }

    /// Whether an expert advises a given farm.
    pub async fn is_linked(pool: &PgPool, expert_id: DbId, farm_id: DbId) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM expert_farms WHERE expert_id = $1 AND farm_id = $2",
        )
        .bind(expert_id)
        .bind(farm_id)
        .fetch_one(pool)
        .await?;
        Ok(count > 0)
    }
}
