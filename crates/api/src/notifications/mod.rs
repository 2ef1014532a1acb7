//! Event-driven notification materialization.

pub mod router;

pub use router::NotificationRouter;
