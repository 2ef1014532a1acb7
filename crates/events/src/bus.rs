//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the central publish/subscribe hub for [`DomainEvent`]s.
//! It is designed to be shared via `Arc<EventBus>` across the application.

use agrihub_core::types::DbId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// Event names
// ---------------------------------------------------------------------------

/// A farmer opened a new Q&A thread.
pub const EVENT_QUESTION_CREATED: &str = "question.created";

/// An expert or manager answered a question.
pub const EVENT_QUESTION_ANSWERED: &str = "question.answered";

/// A task was assigned to a farmer.
pub const EVENT_TASK_ASSIGNED: &str = "task.assigned";

/// A task was soft-deleted by a manager.
pub const EVENT_TASK_DELETED: &str = "task.deleted";

/// An equipment change request was approved or rejected.
pub const EVENT_EQUIPMENT_CHANGE_REVIEWED: &str = "equipment_change.reviewed";

// ---------------------------------------------------------------------------
// DomainEvent
// ---------------------------------------------------------------------------

/// A domain event emitted by a handler after a successful state change.
///
/// Constructed via [`DomainEvent::new`] and enriched with the builder
/// methods [`with_source`](DomainEvent::with_source),
/// [`with_actor`](DomainEvent::with_actor), and
/// [`with_payload`](DomainEvent::with_payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Dot-separated event name, e.g. `"task.assigned"`.
    pub event_type: String,

    /// Optional source entity kind (e.g. `"task"`, `"question"`).
    pub source_entity_type: Option<String>,

    /// Optional source entity database id.
    pub source_entity_id: Option<DbId>,

    /// Optional id of the user that triggered the event.
    pub actor_user_id: Option<DbId>,

    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl DomainEvent {
    /// Create a new event with only the required `event_type`.
    ///
    /// All optional fields default to `None` / empty object.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            source_entity_type: None,
            source_entity_id: None,
            actor_user_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Attach a source entity to the event.
    pub fn with_source(mut self, entity_type: impl Into<String>, entity_id: DbId) -> Self {
        self.source_entity_type = Some(entity_type.into());
        self.source_entity_id = Some(entity_id);
        self
    }

    /// Attach the acting user to the event.
    pub fn with_actor(mut self, user_id: DbId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }

    /// Set the JSON payload for the event.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`DomainEvent`].
///
/// # Usage
///
/// ```rust
/// use agrihub_events::bus::{DomainEvent, EventBus};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(DomainEvent::new("task.assigned"));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped.
    /// The persistence subscriber (when running) ensures database capture.
    pub fn publish(&self, event: DomainEvent) {
        // Ignore the SendError — it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Create a new independent subscription to the event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_reaches_all_subscribers() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(DomainEvent::new(EVENT_TASK_ASSIGNED).with_source("task", 7));

        let e1 = rx1.recv().await.unwrap();
        let e2 = rx2.recv().await.unwrap();
        assert_eq!(e1.event_type, EVENT_TASK_ASSIGNED);
        assert_eq!(e2.source_entity_id, Some(7));
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_silent() {
        let bus = EventBus::default();
        // Must not panic or error.
        bus.publish(DomainEvent::new(EVENT_TASK_DELETED));
    }

    #[test]
    fn test_builder_methods() {
        let event = DomainEvent::new(EVENT_QUESTION_ANSWERED)
            .with_source("question", 3)
            .with_actor(11)
            .with_payload(serde_json::json!({"answer_id": 5}));

        assert_eq!(event.source_entity_type.as_deref(), Some("question"));
        assert_eq!(event.actor_user_id, Some(11));
        assert_eq!(event.payload["answer_id"], 5);
    }
}
