//! Task constants and status-lifecycle validation.
//!
//! A task starts `un-assign`, becomes `assigned` when a farmer is attached,
//! and is then driven by that farmer to `in-progress`, `canceled`, or
//! `completed`. Completed tasks are frozen: they can neither be re-assigned
//! nor soft-deleted.

/// Harvest/collection work.
pub const TASK_TYPE_COLLECT: &str = "collect";

/// Ongoing care work (watering, weeding, treatment).
pub const TASK_TYPE_CARE: &str = "task-care";

/// All valid task types.
pub const VALID_TASK_TYPES: &[&str] = &[TASK_TYPE_COLLECT, TASK_TYPE_CARE];

pub const PRIORITY_LOW: &str = "low";
pub const PRIORITY_MEDIUM: &str = "medium";
pub const PRIORITY_HIGH: &str = "high";

/// All valid task priorities.
pub const VALID_PRIORITIES: &[&str] = &[PRIORITY_LOW, PRIORITY_MEDIUM, PRIORITY_HIGH];

pub const STATUS_UNASSIGNED: &str = "un-assign";
pub const STATUS_ASSIGNED: &str = "assigned";
pub const STATUS_IN_PROGRESS: &str = "in-progress";
pub const STATUS_CANCELED: &str = "canceled";
pub const STATUS_COMPLETED: &str = "completed";

/// All valid task statuses.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_UNASSIGNED,
    STATUS_ASSIGNED,
    STATUS_IN_PROGRESS,
    STATUS_CANCELED,
    STATUS_COMPLETED,
];

/// Statuses an assigned farmer may set on their own task.
pub const FARMER_SETTABLE_STATUSES: &[&str] =
    &[STATUS_IN_PROGRESS, STATUS_CANCELED, STATUS_COMPLETED];

/// Statuses from which a farmer-driven transition may start.
pub const FARMER_TRANSITION_SOURCES: &[&str] = &[STATUS_ASSIGNED, STATUS_IN_PROGRESS];

/// Validate that a task type string is one of the accepted values.
pub fn validate_task_type(task_type: &str) -> Result<(), String> {
    if VALID_TASK_TYPES.contains(&task_type) {
        Ok(())
    } else {
        Err(format!(
            "Invalid task type '{task_type}'. Must be one of: {}",
            VALID_TASK_TYPES.join(", ")
        ))
    }
}

/// Validate that a priority string is one of the accepted values.
pub fn validate_priority(priority: &str) -> Result<(), String> {
    if VALID_PRIORITIES.contains(&priority) {
        Ok(())
    } else {
        Err(format!(
            "Invalid priority '{priority}'. Must be one of: {}",
            VALID_PRIORITIES.join(", ")
        ))
    }
}

/// Validate a farmer self-service status transition request.
///
/// The target must be one of the farmer-settable statuses. Source-state
/// enforcement happens in the repository's guarded UPDATE; this check
/// rejects obviously invalid targets (`un-assign`, `assigned`, unknown)
/// before any query runs.
pub fn validate_farmer_status(status: &str) -> Result<(), String> {
    if FARMER_SETTABLE_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(format!(
            "Invalid status '{status}'. Must be one of: {}",
            FARMER_SETTABLE_STATUSES.join(", ")
        ))
    }
}
