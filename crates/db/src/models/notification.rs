//! Notification entity model.

use agrihub_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub event_type: String,
    pub title: String,
    pub body: String,
    pub source_entity_type: Option<String>,
    pub source_entity_id: Option<DbId>,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}
