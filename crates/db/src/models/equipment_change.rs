//! Equipment change request model and DTOs.

use agrihub_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `equipment_changes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EquipmentChange {
    pub id: DbId,
    pub farm_id: DbId,
    pub equipment_id: DbId,
    pub change_type: String,
    pub quantity: i32,
    pub status: String,
    pub reject_reason: Option<String>,
    pub created_by: DbId,
    pub reviewed_by: Option<DbId>,
    pub reviewed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a change request.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateEquipmentChange {
    pub equipment_id: DbId,
    pub change_type: String,
    #[validate(range(min = 1))]
    pub quantity: i32,
}

/// Request body for rejecting a change.
#[derive(Debug, Deserialize, Validate)]
pub struct RejectEquipmentChange {
    #[validate(length(min = 1, max = 500))]
    pub reason: String,
}

/// A change joined with its equipment name, for listing and XLSX export.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EquipmentChangeRow {
    pub id: DbId,
    pub equipment_id: DbId,
    pub equipment_name: String,
    pub change_type: String,
    pub quantity: i32,
    pub status: String,
    pub reject_reason: Option<String>,
    pub created_at: Timestamp,
    pub reviewed_at: Option<Timestamp>,
}
