//! AgriHub domain core.
//!
//! Pure domain types, constants, and validation helpers shared by the
//! persistence and API layers. This crate performs no I/O.

pub mod daily_note;
pub mod equipment_change;
pub mod error;
pub mod pagination;
pub mod roles;
pub mod task;
pub mod types;
