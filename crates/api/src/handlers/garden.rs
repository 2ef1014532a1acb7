//! Handlers for the `/admin/gardens` resource.

use agrihub_core::error::CoreError;
use agrihub_core::types::DbId;
use agrihub_db::models::garden::{CreateGarden, Garden, UpdateGarden};
use agrihub_db::repositories::{FarmRepo, GardenRepo};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{resolve_farm_scope, RequireManager};
use crate::query::ListParams;
use crate::response::{DataResponse, PagedResponse};
use crate::state::AppState;

/// POST /api/admin/gardens
pub async fn create(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Json(input): Json<CreateGarden>,
) -> AppResult<(StatusCode, Json<DataResponse<Garden>>)> {
    input.validate()?;
    let farm_id = resolve_farm_scope(&user, Some(input.farm_id))?;

    // The farm must be live before hanging a garden off it.
    FarmRepo::find_by_id(&state.pool, farm_id).await?.ok_or(
        AppError::Core(CoreError::NotFound {
            entity: "Farm",
            id: farm_id,
        }),
    )?;

    let garden = GardenRepo::create(&state.pool, &input).await?;
    tracing::info!(garden_id = garden.id, farm_id, "Garden created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: garden })))
}

/// GET /api/admin/gardens
pub async fn list(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Query(params): Query<ListParams>,
) -> AppResult<Json<PagedResponse<Garden>>> {
    let farm_id = resolve_farm_scope(&user, params.farm_id)?;
    let page = GardenRepo::list_for_farm(
        &state.pool,
        farm_id,
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

/// GET /api/admin/gardens/{id}
pub async fn get(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Garden>>> {
    let garden = find_scoped(&state, &user, id).await?;
    Ok(Json(DataResponse { data: garden }))
}

/// PUT /api/admin/gardens/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateGarden>,
) -> AppResult<Json<DataResponse<Garden>>> {
    input.validate()?;
    find_scoped(&state, &user, id).await?;
    let garden = GardenRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Garden",
            id,
        }))?;
    Ok(Json(DataResponse { data: garden }))
}

/// DELETE /api/admin/gardens/{id}
pub async fn remove(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    find_scoped(&state, &user, id).await?;
    GardenRepo::soft_delete(&state.pool, id).await?;
    tracing::info!(garden_id = id, "Garden soft-deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Load a garden and verify the caller may touch its farm.
async fn find_scoped(
    state: &AppState,
    user: &crate::middleware::auth::AuthUser,
    id: DbId,
) -> Result<Garden, AppError> {
    let garden = GardenRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Garden",
            id,
        }))?;
    resolve_farm_scope(user, Some(garden.farm_id))?;
    Ok(garden)
}
