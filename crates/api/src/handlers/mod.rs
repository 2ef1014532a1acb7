//! HTTP request handlers, one module per resource.

pub mod advisor;
pub mod auth;
pub mod daily_note;
pub mod equipment;
pub mod equipment_category;
pub mod equipment_change;
pub mod farm;
pub mod garden;
pub mod news;
pub mod notification;
pub mod question;
pub mod task;
pub mod user;
pub mod weather;
