//! User entity model and DTOs.

use agrihub_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `users` table.
///
/// `password_hash` is deliberately excluded from serialization.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub farm_id: Option<DbId>,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a user. The plaintext password is hashed in the
/// handler before [`CreateUser`] reaches the repository.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUser {
    pub farm_id: Option<DbId>,
    #[validate(length(min = 3, max = 64))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[serde(default)]
    pub full_name: String,
    pub phone: Option<String>,
    pub role: String,
}

/// DTO for updating a user. Absent fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUser {
    pub farm_id: Option<DbId>,
    #[validate(email)]
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub is_active: Option<bool>,
}
