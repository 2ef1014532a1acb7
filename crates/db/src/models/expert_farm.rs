//! Expert-farm link model.

use agrihub_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `expert_farms` table: an expert advises a farm.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ExpertFarm {
    pub id: DbId,
    pub expert_id: DbId,
    pub farm_id: DbId,
    pub created_at: Timestamp,
}
