//! External service clients.
//!
//! Both integrations sit behind traits injected via
//! [`AppState`](crate::state::AppState) so handlers stay testable with
//! in-memory stubs and no network access.

pub mod advisor;
pub mod weather;

use agrihub_core::error::CoreError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use advisor::ChatAdvisorClient;
pub use weather::OpenMeteoClient;

/// A single day of forecast data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyForecast {
    pub date: String,
    pub temperature_max_c: f64,
    pub temperature_min_c: f64,
    pub precipitation_mm: f64,
}

/// Weather forecast for a location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherReport {
    pub latitude: f64,
    pub longitude: f64,
    pub daily: Vec<DailyForecast>,
}

/// Reply from the AI advisor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorReply {
    pub content: String,
}

/// Fetches weather forecasts for farm locations.
#[async_trait]
pub trait WeatherClient: Send + Sync {
    async fn forecast(&self, latitude: f64, longitude: f64) -> Result<WeatherReport, CoreError>;
}

/// Answers free-form farming questions via an AI chat endpoint.
#[async_trait]
pub trait AdvisorClient: Send + Sync {
    async fn advise(&self, prompt: &str) -> Result<AdvisorReply, CoreError>;
}
