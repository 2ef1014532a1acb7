//! Repository for the `equipment_changes` table.
//!
//! The review operations run as single transactions with the change row
//! and its equipment row locked `FOR UPDATE`, so two concurrent reviews of
//! the same pending change cannot both succeed and an export can never
//! drive stock negative.

use agrihub_core::equipment_change::{CHANGE_EXPORT, CHANGE_PENDING};
use agrihub_core::pagination::{clamp_page, clamp_page_size, offset};
use agrihub_core::types::DbId;
use sqlx::PgPool;

use crate::models::equipment_change::{EquipmentChange, EquipmentChangeRow};
use crate::repositories::Page;

/// Column list for `equipment_changes` queries.
const COLUMNS: &str = "id, farm_id, equipment_id, change_type, quantity, status, reject_reason, \
                       created_by, reviewed_by, reviewed_at, created_at, updated_at";

/// Result of an approve/reject attempt.
///
/// The repository reports domain outcomes instead of errors so the handler
/// layer owns the HTTP mapping.
#[derive(Debug)]
pub enum ReviewOutcome {
    /// The decision was recorded (and, for approvals, stock adjusted).
    Done(EquipmentChange),
    /// No change request with that id exists.
    ChangeMissing,
    /// The change is no longer `pending`; its current status is carried.
    NotPending(String),
    /// The target equipment row is gone (soft-deleted since creation).
    EquipmentMissing,
    /// Export approval would overdraw stock; carries the available quantity.
    InsufficientStock { available: i32 },
}

/// Provides CRUD and the review workflow for equipment change requests.
pub struct EquipmentChangeRepo;

impl EquipmentChangeRepo {
    /// Persist a new pending change request.
    pub async fn create(
        pool: &PgPool,
        farm_id: DbId,
        equipment_id: DbId,
        change_type: &str,
        quantity: i32,
        created_by: DbId,
    ) -> Result<EquipmentChange, sqlx::Error> {
        let query = format!(
            "INSERT INTO equipment_changes (farm_id, equipment_id, change_type, quantity, created_by) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EquipmentChange>(&query)
            .bind(farm_id)
            .bind(equipment_id)
            .bind(change_type)
            .bind(quantity)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a change request by id.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<EquipmentChange>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM equipment_changes WHERE id = $1");
        sqlx::query_as::<_, EquipmentChange>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a farm's change requests, newest first, with optional status
    /// filter and keyword match on the equipment name.
    pub async fn list_for_farm(
        pool: &PgPool,
        farm_id: DbId,
        status: Option<&str>,
        keyword: Option<&str>,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<Page<EquipmentChangeRow>, sqlx::Error> {
        let page = clamp_page(page);
        let page_size = clamp_page_size(page_size);
        let pattern = keyword.map(|k| format!("%{k}%"));

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM equipment_changes c \
             JOIN equipment e ON e.id = c.equipment_id \
             WHERE c.farm_id = $1 \
               AND ($2::text IS NULL OR c.status = $2) \
               AND ($3::text IS NULL OR e.name ILIKE $3)",
        )
        .bind(farm_id)
        .bind(status)
        .bind(&pattern)
        .fetch_one(pool)
        .await?;

        let items = sqlx::query_as::<_, EquipmentChangeRow>(
            "SELECT c.id, c.equipment_id, e.name AS equipment_name, c.change_type, \
                    c.quantity, c.status, c.reject_reason, c.created_at, c.reviewed_at \
             FROM equipment_changes c \
             JOIN equipment e ON e.id = c.equipment_id \
             WHERE c.farm_id = $1 \
               AND ($2::text IS NULL OR c.status = $2) \
               AND ($3::text IS NULL OR e.name ILIKE $3) \
             ORDER BY c.created_at DESC \
             LIMIT $4 OFFSET $5",
        )
        .bind(farm_id)
        .bind(status)
        .bind(&pattern)
        .bind(page_size)
        .bind(offset(page, page_size))
        .fetch_all(pool)
        .await?;

        Ok(Page { items, total })
    }

    /// All change rows for a farm, for the XLSX export (no paging).
    pub async fn export_rows(
        pool: &PgPool,
        farm_id: DbId,
    ) -> Result<Vec<EquipmentChangeRow>, sqlx::Error> {
        sqlx::query_as::<_, EquipmentChangeRow>(
            "SELECT c.id, c.equipment_id, e.name AS equipment_name, c.change_type, \
                    c.quantity, c.status, c.reject_reason, c.created_at, c.reviewed_at \
             FROM equipment_changes c \
             JOIN equipment e ON e.id = c.equipment_id \
             WHERE c.farm_id = $1 \
             ORDER BY c.created_at DESC",
        )
        .bind(farm_id)
        .fetch_all(pool)
        .await
    }

    /// Approve a pending change and apply its stock delta atomically.
    ///
    /// Locks the change row, requires it to still be `pending`, locks the
    /// equipment row, re-checks export stock against the locked quantity,
    /// then records the decision and adjusts stock in the same transaction.
    pub async fn approve(
        pool: &PgPool,
        id: DbId,
        reviewer_id: DbId,
    ) -> Result<ReviewOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM equipment_changes WHERE id = $1 FOR UPDATE");
        let change = sqlx::query_as::<_, EquipmentChange>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(change) = change else {
            return Ok(ReviewOutcome::ChangeMissing);
        };
        if change.status != CHANGE_PENDING {
            return Ok(ReviewOutcome::NotPending(change.status));
        }

        // Lock the equipment row so the stock check and the adjustment are
        // one atomic unit.
        let quantity: Option<i32> = sqlx::query_scalar(
            "SELECT quantity FROM equipment \
             WHERE id = $1 AND deleted_at IS NULL \
             FOR UPDATE",
        )
        .bind(change.equipment_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(available) = quantity else {
            return Ok(ReviewOutcome::EquipmentMissing);
        };

        if change.change_type == CHANGE_EXPORT && change.quantity > available {
            return Ok(ReviewOutcome::InsufficientStock { available });
        }

        let delta =
            agrihub_core::equipment_change::stock_delta(&change.change_type, change.quantity);

        let query = format!(
            "UPDATE equipment_changes SET \
                 status = 'approved', reviewed_by = $2, reviewed_at = NOW(), updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, EquipmentChange>(&query)
            .bind(id)
            .bind(reviewer_id)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE equipment SET quantity = quantity + $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(change.equipment_id)
        .bind(delta)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(ReviewOutcome::Done(updated))
    }

    /// Reject a pending change with a reason. No stock effect.
    pub async fn reject(
        pool: &PgPool,
        id: DbId,
        reason: &str,
        reviewer_id: DbId,
    ) -> Result<ReviewOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM equipment_changes WHERE id = $1 FOR UPDATE");
        let change = sqlx::query_as::<_, EquipmentChange>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(change) = change else {
            return Ok(ReviewOutcome::ChangeMissing);
        };
        if change.status != CHANGE_PENDING {
            return Ok(ReviewOutcome::NotPending(change.status));
        }

        let query = format!(
            "UPDATE equipment_changes SET \
                 status = 'rejected', reject_reason = $2, reviewed_by = $3, \
                 reviewed_at = NOW(), updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, EquipmentChange>(&query)
            .bind(id)
            .bind(reason)
            .bind(reviewer_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(ReviewOutcome::Done(updated))
    }
}
