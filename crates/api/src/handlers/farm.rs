//! Handlers for the `/admin/farms` resource (admin only).

use agrihub_core::error::CoreError;
use agrihub_core::types::DbId;
use agrihub_db::models::farm::{CreateFarm, Farm, UpdateFarm};
use agrihub_db::repositories::FarmRepo;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::ListParams;
use crate::response::{DataResponse, PagedResponse};
use crate::state::AppState;

/// POST /api/admin/farms
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Json(input): Json<CreateFarm>,
) -> AppResult<(StatusCode, Json<DataResponse<Farm>>)> {
    input.validate()?;
    let farm = FarmRepo::create(&state.pool, &input).await?;
    tracing::info!(farm_id = farm.id, name = %farm.name, "Farm created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: farm })))
}

/// GET /api/admin/farms
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Query(params): Query<ListParams>,
) -> AppResult<Json<PagedResponse<Farm>>> {
    let page = FarmRepo::list(&state.pool, params.keyword(), params.page, params.page_size)
        .await?;
    Ok(Json(PagedResponse::new(
        page.items,
        page.total,
        params.page(),
        params.page_size(),
    )))
}

/// GET /api/admin/farms/{id}
pub async fn get(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Farm>>> {
    let farm = FarmRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Farm", id }))?;
    Ok(Json(DataResponse { data: farm }))
}

/// PUT /api/admin/farms/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateFarm>,
) -> AppResult<Json<DataResponse<Farm>>> {
    input.validate()?;
    let farm = FarmRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Farm", id }))?;
    Ok(Json(DataResponse { data: farm }))
}

/// DELETE /api/admin/farms/{id}
pub async fn remove(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = FarmRepo::soft_delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound { entity: "Farm", id }));
    }
    tracing::info!(farm_id = id, "Farm soft-deleted");
    Ok(StatusCode::NO_CONTENT)
}
