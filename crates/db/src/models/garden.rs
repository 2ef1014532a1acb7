//! Garden entity model and DTOs.

use agrihub_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `gardens` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Garden {
    pub id: DbId,
    pub farm_id: DbId,
    pub name: String,
    pub area_m2: Option<f64>,
    pub description: String,
    pub image: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a garden.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateGarden {
    pub farm_id: DbId,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(range(min = 0.0))]
    pub area_m2: Option<f64>,
    #[serde(default)]
    pub description: String,
    pub image: Option<String>,
}

/// DTO for updating a garden. Absent fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateGarden {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(range(min = 0.0))]
    pub area_m2: Option<f64>,
    pub description: Option<String>,
    pub image: Option<String>,
}
