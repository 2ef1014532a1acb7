//! Repository for the `tasks` table and its guarded lifecycle operations.
//!
//! Assignment, farmer status changes, and soft deletion all run inside a
//! transaction that also appends the `task_histories` audit row, and use
//! guarded UPDATEs (`WHERE` on the expected current state) so concurrent
//! requests cannot both pass a stale precondition.

use agrihub_core::pagination::{clamp_page, clamp_page_size, offset};
use agrihub_core::task::{
    STATUS_ASSIGNED, STATUS_COMPLETED, STATUS_IN_PROGRESS, STATUS_UNASSIGNED,
};
use agrihub_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::task::{CreateTask, Task, TaskListFilter, UpdateTask};
use crate::repositories::Page;

/// Column list for `tasks` queries.
const COLUMNS: &str = "id, farm_id, garden_id, farmer_id, name, description, image, task_type, \
                       priority, status, start_date, end_date, created_at, updated_at";

/// Result of an assignment attempt.
#[derive(Debug)]
pub enum AssignOutcome {
    Assigned(Task),
    /// No live task with that id exists.
    TaskMissing,
    /// The task already has a farmer.
    AlreadyAssigned,
    /// The task is completed and frozen.
    Completed,
    /// The task exists but the guarded update matched nothing (state moved
    /// between the read and the write); treated as already-assigned.
    Raced,
}

/// Result of a farmer-driven status change.
#[derive(Debug)]
pub enum StatusOutcome {
    Changed(Task),
    /// No live task with that id is assigned to this farmer.
    NotAssignedToFarmer,
    /// The task is not in a state a farmer may transition from.
    InvalidState(String),
}

/// Result of a soft-delete attempt.
#[derive(Debug)]
pub enum RemoveOutcome {
    Removed(Task),
    TaskMissing,
    /// Completed tasks cannot be deleted.
    Completed,
}

/// Provides CRUD and lifecycle operations for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Create a task in its initial `un-assign` state.
    pub async fn create(
        pool: &PgPool,
        farm_id: DbId,
        input: &CreateTask,
        priority: &str,
    ) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (farm_id, garden_id, name, description, image, task_type, \
                                priority, start_date, end_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(farm_id)
            .bind(input.garden_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.image)
            .bind(&input.task_type)
            .bind(priority)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_one(pool)
            .await
    }

    /// Find a task by id, excluding soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a farm's tasks, newest first, with filters and keyword match.
    pub async fn list_for_farm(
        pool: &PgPool,
        farm_id: DbId,
        filter: &TaskListFilter,
        keyword: Option<&str>,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<Page<Task>, sqlx::Error> {
        let page = clamp_page(page);
        let page_size = clamp_page_size(page_size);
        let pattern = keyword.map(|k| format!("%{k}%"));

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tasks \
             WHERE farm_id = $1 AND deleted_at IS NULL \
               AND ($2::bigint IS NULL OR garden_id = $2) \
               AND ($3::bigint IS NULL OR farmer_id = $3) \
               AND ($4::text IS NULL OR status = $4) \
               AND ($5::text IS NULL OR name ILIKE $5)",
        )
        .bind(farm_id)
        .bind(filter.garden_id)
        .bind(filter.farmer_id)
        .bind(&filter.status)
        .bind(&pattern)
        .fetch_one(pool)
        .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM tasks \
             WHERE farm_id = $1 AND deleted_at IS NULL \
               AND ($2::bigint IS NULL OR garden_id = $2) \
               AND ($3::bigint IS NULL OR farmer_id = $3) \
               AND ($4::text IS NULL OR status = $4) \
               AND ($5::text IS NULL OR name ILIKE $5) \
             ORDER BY created_at DESC \
             LIMIT $6 OFFSET $7"
        );
        let items = sqlx::query_as::<_, Task>(&query)
            .bind(farm_id)
            .bind(filter.garden_id)
            .bind(filter.farmer_id)
            .bind(&filter.status)
            .bind(&pattern)
            .bind(page_size)
            .bind(offset(page, page_size))
            .fetch_all(pool)
            .await?;

        Ok(Page { items, total })
    }

    /// List the tasks assigned to a farmer, newest first.
    pub async fn list_for_farmer(
        pool: &PgPool,
        farmer_id: DbId,
        status: Option<&str>,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<Page<Task>, sqlx::Error> {
        let page = clamp_page(page);
        let page_size = clamp_page_size(page_size);

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tasks \
             WHERE farmer_id = $1 AND deleted_at IS NULL \
               AND ($2::text IS NULL OR status = $2)",
        )
        .bind(farmer_id)
        .bind(status)
        .fetch_one(pool)
        .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM tasks \
             WHERE farmer_id = $1 AND deleted_at IS NULL \
               AND ($2::text IS NULL OR status = $2) \
             ORDER BY created_at DESC \
             LIMIT $3 OFFSET $4"
        );
        let items = sqlx::query_as::<_, Task>(&query)
            .bind(farmer_id)
            .bind(status)
            .bind(page_size)
            .bind(offset(page, page_size))
            .fetch_all(pool)
            .await?;

        Ok(Page { items, total })
    }

    /// Update a task's descriptive fields; absent fields are left unchanged.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET \
                 name = COALESCE($2, name), \
                 description = COALESCE($3, description), \
                 image = COALESCE($4, image), \
                 priority = COALESCE($5, priority), \
                 start_date = COALESCE($6, start_date), \
                 end_date = COALESCE($7, end_date), \
                 updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.image)
            .bind(&input.priority)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_optional(pool)
            .await
    }

    /// Assign a farmer to an unassigned task.
    ///
    /// The guarded UPDATE (`farmer_id IS NULL AND status = 'un-assign'`)
    /// makes double assignment impossible even under concurrent calls; the
    /// audit row is appended in the same transaction.
    pub async fn assign_farmer(
        pool: &PgPool,
        task_id: DbId,
        farmer_id: DbId,
    ) -> Result<AssignOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1 AND deleted_at IS NULL FOR UPDATE");
        let task = sqlx::query_as::<_, Task>(&query)
            .bind(task_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(task) = task else {
            return Ok(AssignOutcome::TaskMissing);
        };
        if task.farmer_id.is_some() {
            return Ok(AssignOutcome::AlreadyAssigned);
        }
        if task.status == STATUS_COMPLETED {
            return Ok(AssignOutcome::Completed);
        }

        let query = format!(
            "UPDATE tasks SET farmer_id = $2, status = $3, updated_at = NOW() \
             WHERE id = $1 AND farmer_id IS NULL AND status = $4 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Task>(&query)
            .bind(task_id)
            .bind(farmer_id)
            .bind(STATUS_ASSIGNED)
            .bind(STATUS_UNASSIGNED)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(updated) = updated else {
            return Ok(AssignOutcome::Raced);
        };

        Self::append_history(&mut tx, task_id, Some(farmer_id), STATUS_ASSIGNED, None).await?;

        tx.commit().await?;
        Ok(AssignOutcome::Assigned(updated))
    }

    /// Farmer self-service status change, scoped to the assigned farmer.
    ///
    /// The caller must have validated `status` against the farmer-settable
    /// set. The UPDATE is scoped by `farmer_id`, so a non-assignee simply
    /// matches nothing.
    pub async fn change_status_assigned(
        pool: &PgPool,
        task_id: DbId,
        farmer_id: DbId,
        status: &str,
        comment: Option<&str>,
    ) -> Result<StatusOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "SELECT {COLUMNS} FROM tasks \
             WHERE id = $1 AND farmer_id = $2 AND deleted_at IS NULL \
             FOR UPDATE"
        );
        let task = sqlx::query_as::<_, Task>(&query)
            .bind(task_id)
            .bind(farmer_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(task) = task else {
            return Ok(StatusOutcome::NotAssignedToFarmer);
        };
        if task.status != STATUS_ASSIGNED && task.status != STATUS_IN_PROGRESS {
            return Ok(StatusOutcome::InvalidState(task.status));
        }

        let query = format!(
            "UPDATE tasks SET status = $3, updated_at = NOW() \
             WHERE id = $1 AND farmer_id = $2 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Task>(&query)
            .bind(task_id)
            .bind(farmer_id)
            .bind(status)
            .fetch_one(&mut *tx)
            .await?;

        Self::append_history(&mut tx, task_id, Some(farmer_id), status, comment).await?;

        tx.commit().await?;
        Ok(StatusOutcome::Changed(updated))
    }

    /// Soft-delete a task with deletion metadata and an audit row.
    ///
    /// Completed tasks are refused without mutation.
    pub async fn soft_delete(
        pool: &PgPool,
        task_id: DbId,
        deleted_by: DbId,
        reason: &str,
    ) -> Result<RemoveOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1 AND deleted_at IS NULL FOR UPDATE");
        let task = sqlx::query_as::<_, Task>(&query)
            .bind(task_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(task) = task else {
            return Ok(RemoveOutcome::TaskMissing);
        };
        if task.status == STATUS_COMPLETED {
            return Ok(RemoveOutcome::Completed);
        }

        let query = format!(
            "UPDATE tasks SET deleted_at = NOW(), deleted_by = $2, delete_reason = $3, \
                              updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Task>(&query)
            .bind(task_id)
            .bind(deleted_by)
            .bind(reason)
            .fetch_one(&mut *tx)
            .await?;

        Self::append_history(&mut tx, task_id, task.farmer_id, &task.status, Some(reason)).await?;

        tx.commit().await?;
        Ok(RemoveOutcome::Removed(updated))
    }

    /// Append a `task_histories` row inside an open transaction.
    async fn append_history(
        tx: &mut Transaction<'_, Postgres>,
        task_id: DbId,
        farmer_id: Option<DbId>,
        status: &str,
        comment: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO task_histories (task_id, farmer_id, status, comment) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(task_id)
        .bind(farmer_id)
        .bind(status)
        .bind(comment)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
