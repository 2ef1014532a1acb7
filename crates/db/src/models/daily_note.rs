//! Daily note models and DTOs.

use agrihub_core::daily_note::ConsumptionLine;
use agrihub_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `task_daily_notes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TaskDailyNote {
    pub id: DbId,
    pub task_id: DbId,
    pub farmer_id: DbId,
    pub note_type: String,
    pub comment: Option<String>,
    pub harvest_quantity: Option<i32>,
    pub created_at: Timestamp,
}

/// A row from the `task_daily_note_equipment` junction table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TaskDailyNoteEquipment {
    pub id: DbId,
    pub note_id: DbId,
    pub equipment_id: DbId,
    pub quantity: i32,
}

/// DTO for creating a daily note.
///
/// `harvest_quantity` applies to harvest notes; `equipment` lines apply to
/// consumption notes. The handler validates the combination before the
/// repository transaction runs.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDailyNote {
    pub note_type: String,
    #[validate(length(max = 1000))]
    pub comment: Option<String>,
    #[validate(range(min = 0))]
    pub harvest_quantity: Option<i32>,
    #[serde(default)]
    pub equipment: Vec<ConsumptionLine>,
}

/// A note together with its consumption lines, for detail responses.
#[derive(Debug, Serialize)]
pub struct DailyNoteWithLines {
    #[serde(flatten)]
    pub note: TaskDailyNote,
    pub equipment: Vec<TaskDailyNoteEquipment>,
}
