//! Handlers for the `/admin/equipment-categories` resource (admin only).

use agrihub_core::error::CoreError;
use agrihub_core::types::DbId;
use agrihub_db::models::equipment::{
    CreateEquipmentCategory, EquipmentCategory, UpdateEquipmentCategory,
};
use agrihub_db::repositories::EquipmentCategoryRepo;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireManager};
use crate::query::ListParams;
use crate::response::{DataResponse, PagedResponse};
use crate::state::AppState;

/// POST /api/admin/equipment-categories
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Json(input): Json<CreateEquipmentCategory>,
) -> AppResult<(StatusCode, Json<DataResponse<EquipmentCategory>>)> {
    input.validate()?;
    let category = EquipmentCategoryRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// GET /api/admin/equipment-categories
///
/// Managers may read the catalog; mutation is admin only.
pub async fn list(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    Query(params): Query<ListParams>,
) -> AppResult<Json<PagedResponse<EquipmentCategory>>> {
    let page = EquipmentCategoryRepo::list(
        &state.pool,
        params.keyword(),
        params.page,
        params.page_size,
    )
    .await?;
    Ok(Json(PagedResponse::new(
        page.items,
        page.total,
        params.page(),
        params.page_size(),
    )))
}

/// GET /api/admin/equipment-categories/{id}
pub async fn get(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<EquipmentCategory>>> {
    let category = EquipmentCategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "EquipmentCategory",
            id,
        }))?;
    Ok(Json(DataResponse { data: category }))
}

/// PUT /api/admin/equipment-categories/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEquipmentCategory>,
) -> AppResult<Json<DataResponse<EquipmentCategory>>> {
    input.validate()?;
    let category = EquipmentCategoryRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "EquipmentCategory",
            id,
        }))?;
    Ok(Json(DataResponse { data: category }))
}

/// DELETE /api/admin/equipment-categories/{id}
pub async fn remove(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = EquipmentCategoryRepo::soft_delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "EquipmentCategory",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}
