//! Event-to-notification routing engine.
//!
//! [`NotificationRouter`] subscribes to the event bus and materializes a
//! `notifications` row for every user affected by an event. Delivery is
//! pull-based: clients read their rows through the notification endpoints.

use agrihub_core::roles::{ROLE_EXPERT, ROLE_MANAGER};
use agrihub_core::types::DbId;
use agrihub_db::repositories::{ExpertFarmRepo, NotificationRepo, UserRepo};
use agrihub_db::DbPool;
use agrihub_events::bus::{
    EVENT_EQUIPMENT_CHANGE_REVIEWED, EVENT_QUESTION_ANSWERED, EVENT_QUESTION_CREATED,
    EVENT_TASK_ASSIGNED, EVENT_TASK_DELETED,
};
use agrihub_events::DomainEvent;
use tokio::sync::broadcast;

/// Routes domain events to per-user notification rows.
pub struct NotificationRouter {
    pool: DbPool,
}

impl NotificationRouter {
    /// Create a new router over the given database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Run the main routing loop.
    ///
    /// Subscribes to the event bus via `receiver` and processes each event.
    /// The loop exits when the channel is closed (i.e. the
    /// [`EventBus`](agrihub_events::EventBus) is dropped).
    pub async fn run(self, mut receiver: broadcast::Receiver<DomainEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = self.route_event(&event).await {
                        tracing::error!(
                            error = %e,
                            event_type = %event.event_type,
                            "Failed to route event"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notification router lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification router shutting down");
                    break;
                }
            }
        }
    }

    /// Determine targets and message for a single event, then persist rows.
    async fn route_event(&self, event: &DomainEvent) -> Result<(), sqlx::Error> {
        let (targets, title, body) = match event.event_type.as_str() {
            EVENT_QUESTION_CREATED => {
                let Some(farm_id) = payload_id(event, "farm_id") else {
                    return Ok(());
                };
                let mut targets =
                    UserRepo::ids_with_role_for_farm(&self.pool, farm_id, ROLE_MANAGER).await?;
                targets.extend(ExpertFarmRepo::expert_ids_for_farm(&self.pool, farm_id).await?);
                (
                    targets,
                    "New question".to_string(),
                    payload_str(event, "title").unwrap_or_default(),
                )
            }
            EVENT_QUESTION_ANSWERED => {
                let Some(author_id) = payload_id(event, "author_id") else {
                    return Ok(());
                };
                (
                    vec![author_id],
                    "Your question was answered".to_string(),
                    payload_str(event, "title").unwrap_or_default(),
                )
            }
            EVENT_TASK_ASSIGNED => {
                let Some(farmer_id) = payload_id(event, "farmer_id") else {
                    return Ok(());
                };
                (
                    vec![farmer_id],
                    "New task assigned".to_string(),
                    payload_str(event, "name").unwrap_or_default(),
                )
            }
            EVENT_TASK_DELETED => {
                // Only the assigned farmer cares; unassigned deletions notify no one.
                let Some(farmer_id) = payload_id(event, "farmer_id") else {
                    return Ok(());
                };
                (
                    vec![farmer_id],
                    "Task removed".to_string(),
                    payload_str(event, "reason").unwrap_or_default(),
                )
            }
            EVENT_EQUIPMENT_CHANGE_REVIEWED => {
                let Some(created_by) = payload_id(event, "created_by") else {
                    return Ok(());
                };
                let status = payload_str(event, "status").unwrap_or_default();
                (
                    vec![created_by],
                    format!("Equipment change {status}"),
                    payload_str(event, "reject_reason").unwrap_or_default(),
                )
            }
            other => {
                tracing::debug!(event_type = %other, "No notification routing for event");
                return Ok(());
            }
        };

        for user_id in targets {
            NotificationRepo::create(
                &self.pool,
                user_id,
                &event.event_type,
                &title,
                &body,
                event.source_entity_type.as_deref(),
                event.source_entity_id,
            )
            .await?;
        }

        Ok(())
    }
}

/// Read an id-valued field from the event payload.
fn payload_id(event: &DomainEvent, key: &str) -> Option<DbId> {
    event.payload.get(key).and_then(|v| v.as_i64())
}

/// Read a string-valued field from the event payload.
fn payload_str(event: &DomainEvent, key: &str) -> Option<String> {
    event
        .payload
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}
