//! Repository for daily notes and their equipment consumption lines.
//!
//! Consumption notes validate every line against current stock and apply
//! the decrements in one transaction with the equipment rows locked
//! `FOR UPDATE` (in id order, to avoid lock-order deadlocks). Either the
//! whole batch lands or nothing does.

use agrihub_core::daily_note::{ConsumptionLine, NOTE_CONSUMPTION};
use agrihub_core::pagination::{clamp_page, clamp_page_size, offset};
use agrihub_core::types::DbId;
use sqlx::PgPool;

use crate::models::daily_note::{TaskDailyNote, TaskDailyNoteEquipment};
use crate::repositories::Page;

/// Column list for `task_daily_notes` queries.
const COLUMNS: &str = "id, task_id, farmer_id, note_type, comment, harvest_quantity, created_at";

/// Result of a daily-note creation attempt.
#[derive(Debug)]
pub enum DailyNoteOutcome {
    Created(TaskDailyNote),
    /// A listed equipment row does not exist (or is soft-deleted).
    EquipmentMissing { equipment_id: DbId },
    /// A listed line exceeds current stock; nothing was written.
    InsufficientStock { equipment_id: DbId, available: i32 },
}

/// Provides creation and reads for task daily notes.
pub struct DailyNoteRepo;

impl DailyNoteRepo {
    /// Create a daily note; consumption notes atomically decrement stock.
    ///
    /// The caller validates the note type, line shape, and task/farmer
    /// ownership beforehand. For consumption notes `lines` must be
    /// non-empty with positive, de-duplicated quantities.
    pub async fn create(
        pool: &PgPool,
        task_id: DbId,
        farmer_id: DbId,
        note_type: &str,
        comment: Option<&str>,
        harvest_quantity: Option<i32>,
        lines: &[ConsumptionLine],
    ) -> Result<DailyNoteOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if note_type == NOTE_CONSUMPTION {
            // Lock in ascending equipment id order and validate the whole
            // batch before any write.
            let mut ordered: Vec<&ConsumptionLine> = lines.iter().collect();
            ordered.sort_by_key(|l| l.equipment_id);

            for line in &ordered {
                let available: Option<i32> = sqlx::query_scalar(
                    "SELECT quantity FROM equipment \
                     WHERE id = $1 AND deleted_at IS NULL \
                     FOR UPDATE",
                )
                .bind(line.equipment_id)
                .fetch_optional(&mut *tx)
                .await?;

                let Some(available) = available else {
                    return Ok(DailyNoteOutcome::EquipmentMissing {
                        equipment_id: line.equipment_id,
                    });
                };
                if line.quantity > available {
                    return Ok(DailyNoteOutcome::InsufficientStock {
                        equipment_id: line.equipment_id,
                        available,
                    });
                }
            }
        }

        let query = format!(
            "INSERT INTO task_daily_notes (task_id, farmer_id, note_type, comment, harvest_quantity) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        let note = sqlx::query_as::<_, TaskDailyNote>(&query)
            .bind(task_id)
            .bind(farmer_id)
            .bind(note_type)
            .bind(comment)
            .bind(harvest_quantity)
            .fetch_one(&mut *tx)
            .await?;

        if note_type == NOTE_CONSUMPTION {
            for line in lines {
                sqlx::query(
                    "INSERT INTO task_daily_note_equipment (note_id, equipment_id, quantity) \
                     VALUES ($1, $2, $3)",
                )
                .bind(note.id)
                .bind(line.equipment_id)
                .bind(line.quantity)
                .execute(&mut *tx)
                .await?;

                sqlx::query(
                    "UPDATE equipment SET quantity = quantity - $2, updated_at = NOW() \
                     WHERE id = $1",
                )
                .bind(line.equipment_id)
                .bind(line.quantity)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(DailyNoteOutcome::Created(note))
    }

    /// Find a note by id.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<TaskDailyNote>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM task_daily_notes WHERE id = $1");
        sqlx::query_as::<_, TaskDailyNote>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a task's notes, newest first.
    pub async fn list_for_task(
        pool: &PgPool,
        task_id: DbId,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<Page<TaskDailyNote>, sqlx::Error> {
        let page = clamp_page(page);
        let page_size = clamp_page_size(page_size);

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM task_daily_notes WHERE task_id = $1")
                .bind(task_id)
                .fetch_one(pool)
                .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM task_daily_notes \
             WHERE task_id = $1 \
             ORDER BY created_at DESC \
             LIMIT $2 OFFSET $3"
        );
        let items = sqlx::query_as::<_, TaskDailyNote>(&query)
            .bind(task_id)
            .bind(page_size)
            .bind(offset(page, page_size))
            .fetch_all(pool)
            .await?;

        Ok(Page { items, total })
    }

    /// The consumption lines of a note.
    pub async fn lines_for_note(
        pool: &PgPool,
        note_id: DbId,
    ) -> Result<Vec<TaskDailyNoteEquipment>, sqlx::Error> {
        sqlx::query_as::<_, TaskDailyNoteEquipment>(
            "SELECT id, note_id, equipment_id, quantity \
             FROM task_daily_note_equipment \
             WHERE note_id = $1 \
             ORDER BY id",
        )
        .bind(note_id)
        .fetch_all(pool)
        .await
    }
}
