//! Task and task-history models and DTOs.

use agrihub_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub farm_id: DbId,
    pub garden_id: DbId,
    pub farmer_id: Option<DbId>,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub task_type: String,
    pub priority: String,
    pub status: String,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the append-only `task_histories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TaskHistory {
    pub id: DbId,
    pub task_id: DbId,
    pub farmer_id: Option<DbId>,
    pub status: String,
    pub comment: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for creating a task.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTask {
    pub garden_id: DbId,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub image: Option<String>,
    pub task_type: String,
    pub priority: Option<String>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
}

/// DTO for updating a task's descriptive fields.
///
/// Assignment and status changes go through their dedicated operations so
/// the audit log and guarded transitions cannot be bypassed.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTask {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub priority: Option<String>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
}

/// Request body for assigning a farmer to a task.
#[derive(Debug, Deserialize)]
pub struct AssignFarmerRequest {
    pub farmer_id: DbId,
}

/// Request body for a farmer-driven status change.
#[derive(Debug, Deserialize)]
pub struct ChangeStatusRequest {
    pub status: String,
    pub comment: Option<String>,
}

/// Request body for soft-deleting a task.
#[derive(Debug, Deserialize, Validate)]
pub struct RemoveTaskRequest {
    #[validate(length(min = 1, max = 500))]
    pub reason: String,
}

/// Query filters for admin task listing.
#[derive(Debug, Default, Deserialize)]
pub struct TaskListFilter {
    pub garden_id: Option<DbId>,
    pub farmer_id: Option<DbId>,
    pub status: Option<String>,
}
