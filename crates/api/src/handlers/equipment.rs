//! Handlers for the `/admin/equipments` resource.

use agrihub_core::error::CoreError;
use agrihub_core::types::DbId;
use agrihub_db::models::equipment::{CreateEquipment, Equipment, UpdateEquipment};
use agrihub_db::repositories::{EquipmentCategoryRepo, EquipmentRepo, FarmRepo};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{resolve_farm_scope, RequireManager};
use crate::query::ListParams;
use crate::response::{DataResponse, PagedResponse};
use crate::state::AppState;

/// Extra query parameters for equipment listing.
#[derive(Debug, Default, Deserialize)]
pub struct EquipmentFilter {
    pub category_id: Option<DbId>,
}

/// POST /api/admin/equipments
pub async fn create(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Json(input): Json<CreateEquipment>,
) -> AppResult<(StatusCode, Json<DataResponse<Equipment>>)> {
    input.validate()?;
    let farm_id = resolve_farm_scope(&user, Some(input.farm_id))?;

    FarmRepo::find_by_id(&state.pool, farm_id).await?.ok_or(
        AppError::Core(CoreError::NotFound {
            entity: "Farm",
            id: farm_id,
        }),
    )?;
    EquipmentCategoryRepo::find_by_id(&state.pool, input.category_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "EquipmentCategory",
            id: input.category_id,
        }))?;

    let equipment = EquipmentRepo::create(&state.pool, &input).await?;
    tracing::info!(equipment_id = equipment.id, farm_id, "Equipment created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: equipment })))
}

/// GET /api/admin/equipments
pub async fn list(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Query(params): Query<ListParams>,
    Query(filter): Query<EquipmentFilter>,
) -> AppResult<Json<PagedResponse<Equipment>>> {
    let farm_id = resolve_farm_scope(&user, params.farm_id)?;
    let page = EquipmentRepo::list_for_farm(
        &state.pool,
        farm_id,
        filter.category_id,
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

/// GET /api/admin/equipments/{id}
pub async fn get(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Equipment>>> {
    let equipment = find_scoped(&state, &user, id).await?;
    Ok(Json(DataResponse { data: equipment }))
}

/// PUT /api/admin/equipments/{id}
///
/// Descriptive fields only; quantity moves exclusively through the
/// change-approval and consumption workflows.
pub async fn update(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEquipment>,
) -> AppResult<Json<DataResponse<Equipment>>> {
    input.validate()?;
    find_scoped(&state, &user, id).await?;

    if let Some(category_id) = input.category_id {
        EquipmentCategoryRepo::find_by_id(&state.pool, category_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "EquipmentCategory",
                id: category_id,
            }))?;
    }

    let equipment = EquipmentRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Equipment",
            id,
        }))?;
    Ok(Json(DataResponse { data: equipment }))
}

/// DELETE /api/admin/equipments/{id}
pub async fn remove(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    find_scoped(&state, &user, id).await?;
    EquipmentRepo::soft_delete(&state.pool, id).await?;
    tracing::info!(equipment_id = id, "Equipment soft-deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Load an equipment row and verify the caller may touch its farm.
async fn find_scoped(
    state: &AppState,
    user: &crate::middleware::auth::AuthUser,
    id: DbId,
) -> Result<Equipment, AppError> {
    let equipment = EquipmentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Equipment",
            id,
        }))?;
    resolve_farm_scope(user, Some(equipment.farm_id))?;
    Ok(equipment)
}
