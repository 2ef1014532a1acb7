//! Open-Meteo weather client.

use agrihub_core::error::CoreError;
use async_trait::async_trait;
use serde::Deserialize;

use super::{DailyForecast, WeatherClient, WeatherReport};

/// [`WeatherClient`] backed by the Open-Meteo forecast API.
pub struct OpenMeteoClient {
    http: reqwest::Client,
    base_url: String,
}

impl OpenMeteoClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

/// Relevant subset of the Open-Meteo response body.
#[derive(Debug, Deserialize)]
struct OpenMeteoResponse {
    latitude: f64,
    longitude: f64,
    daily: OpenMeteoDaily,
}

#[derive(Debug, Deserialize)]
struct OpenMeteoDaily {
    time: Vec<String>,
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
    precipitation_sum: Vec<f64>,
}

#[async_trait]
impl WeatherClient for OpenMeteoClient {
    async fn forecast(&self, latitude: f64, longitude: f64) -> Result<WeatherReport, CoreError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                (
                    "daily",
                    "temperature_2m_max,temperature_2m_min,precipitation_sum".to_string(),
                ),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await
            .map_err(|e| CoreError::Upstream(format!("Weather request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(CoreError::Upstream(format!(
                "Weather service returned status {}",
                response.status()
            )));
        }

        let body: OpenMeteoResponse = response
            .json()
            .await
            .map_err(|e| CoreError::Upstream(format!("Invalid weather response: {e}")))?;

        let daily = body
            .daily
            .time
            .iter()
            .enumerate()
            .map(|(i, date)| DailyForecast {
                date: date.clone(),
                temperature_max_c: body.daily.temperature_2m_max.get(i).copied().unwrap_or(0.0),
                temperature_min_c: body.daily.temperature_2m_min.get(i).copied().unwrap_or(0.0),
                precipitation_mm: body.daily.precipitation_sum.get(i).copied().unwrap_or(0.0),
            })
            .collect();

        Ok(WeatherReport {
            latitude: body.latitude,
            longitude: body.longitude,
            daily,
        })
    }
}
