use std::sync::Arc;

use crate::clients::{AdvisorClient, WeatherClient};
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: agrihub_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Centralized event bus for publishing domain events.
    pub event_bus: Arc<agrihub_events::EventBus>,
    /// Weather forecast client (real implementation or test stub).
    pub weather: Arc<dyn WeatherClient>,
    /// AI advisor client (real implementation or test stub).
    pub advisor: Arc<dyn AdvisorClient>,
}
