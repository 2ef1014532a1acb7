//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Soft-deleted rows
//! (`deleted_at IS NOT NULL`) are excluded from every read; there is no
//! "include archived" path in the current API surface.

pub mod daily_note_repo;
pub mod equipment_category_repo;
pub mod equipment_change_repo;
pub mod equipment_repo;
pub mod event_repo;
pub mod expert_farm_repo;
pub mod farm_repo;
pub mod garden_repo;
pub mod news_repo;
pub mod notification_repo;
pub mod question_repo;
pub mod session_repo;
pub mod task_history_repo;
pub mod task_repo;
pub mod user_repo;

pub use daily_note_repo::{DailyNoteOutcome, DailyNoteRepo};
pub use equipment_category_repo::EquipmentCategoryRepo;
pub use equipment_change_repo::{EquipmentChangeRepo, ReviewOutcome};
pub use equipment_repo::EquipmentRepo;
pub use event_repo::EventRepo;
pub use expert_farm_repo::ExpertFarmRepo;
pub use farm_repo::FarmRepo;
pub use garden_repo::GardenRepo;
pub use news_repo::NewsRepo;
pub use notification_repo::NotificationRepo;
pub use question_repo::QuestionRepo;
pub use session_repo::SessionRepo;
pub use task_history_repo::TaskHistoryRepo;
pub use task_repo::{AssignOutcome, RemoveOutcome, StatusOutcome, TaskRepo};
pub use user_repo::UserRepo;

/// One page of a list query, with the unpaged total for envelope building.
#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}
