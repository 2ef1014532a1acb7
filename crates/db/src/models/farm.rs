//! Farm entity model and DTOs.

use agrihub_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `farms` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Farm {
    pub id: DbId,
    pub name: String,
    pub address: String,
    pub description: String,
    pub image: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a farm.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateFarm {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub description: String,
    pub image: Option<String>,
}

/// DTO for updating a farm. Absent fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateFarm {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}
