//! Equipment and equipment-category models and DTOs.

use agrihub_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `equipment_categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EquipmentCategory {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an equipment category.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateEquipmentCategory {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// DTO for updating an equipment category.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateEquipmentCategory {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub description: Option<String>,
}

/// A row from the `equipment` table.
///
/// `quantity` is mutated only by the equipment-change approval and
/// consumption-note transactions; never by a plain update.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Equipment {
    pub id: DbId,
    pub farm_id: DbId,
    pub category_id: DbId,
    pub name: String,
    pub image: Option<String>,
    pub quantity: i32,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating equipment.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateEquipment {
    pub farm_id: DbId,
    pub category_id: DbId,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub image: Option<String>,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub quantity: i32,
    #[serde(default)]
    pub description: String,
}

/// DTO for updating equipment descriptive fields.
///
/// Quantity is intentionally absent: stock moves only through the
/// change-approval and consumption workflows.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateEquipment {
    pub category_id: Option<DbId>,
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
}
