//! Entity models and request DTOs, one module per table family.

pub mod daily_note;
pub mod equipment;
pub mod equipment_change;
pub mod event;
pub mod expert_farm;
pub mod farm;
pub mod garden;
pub mod news;
pub mod notification;
pub mod question;
pub mod session;
pub mod task;
pub mod user;
