//! Handler for the AI farming advisor (`/api/web/advisor`).

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use crate::clients::AdvisorReply;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for an advisor prompt.
#[derive(Debug, Deserialize, Validate)]
pub struct AdviseRequest {
    #[validate(length(min = 1, max = 4000))]
    pub prompt: String,
}

/// POST /api/web/advisor
pub async fn advise(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<AdviseRequest>,
) -> AppResult<Json<DataResponse<AdvisorReply>>> {
    input.validate()?;
    tracing::debug!(user_id = user.user_id, "Advisor prompt received");
    let reply = state.advisor.advise(&input.prompt).await?;
    Ok(Json(DataResponse { data: reply }))
}
