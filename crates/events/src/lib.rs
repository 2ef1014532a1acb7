//! AgriHub event bus and durable event capture.
//!
//! Handlers publish domain events through an explicit pub/sub abstraction
//! instead of a process-global side-channel:
//!
//! - [`EventBus`] — in-process pub/sub hub backed by `tokio::sync::broadcast`,
//!   injected into handlers via application state.
//! - [`DomainEvent`] — the canonical event envelope.
//! - [`EventPersistence`] — background service that writes every published
//!   event to the `events` table.

pub mod bus;
pub mod persistence;

pub use bus::{DomainEvent, EventBus};
pub use persistence::EventPersistence;
