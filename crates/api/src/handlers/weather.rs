//! Handler for the weather forecast proxy (`/api/web/weather`).

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::clients::WeatherReport;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for the forecast endpoint.
#[derive(Debug, Deserialize)]
pub struct ForecastParams {
    pub latitude: f64,
    pub longitude: f64,
}

/// GET /api/web/weather?latitude=&longitude=
pub async fn forecast(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<ForecastParams>,
) -> AppResult<Json<DataResponse<WeatherReport>>> {
    let report = state
        .weather
        .forecast(params.latitude, params.longitude)
        .await?;
    Ok(Json(DataResponse { data: report }))
}
