//! News item model and DTOs.

use agrihub_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `news` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct News {
    pub id: DbId,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub published_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for publishing a news item.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateNews {
    #[validate(length(min = 1, max = 300))]
    pub title: String,
    #[validate(length(min = 1))]
    pub content: String,
    pub image: Option<String>,
}

/// DTO for updating a news item.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateNews {
    #[validate(length(min = 1, max = 300))]
    pub title: Option<String>,
    pub content: Option<String>,
    pub image: Option<String>,
}
