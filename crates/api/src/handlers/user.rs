//! Handlers for the `/admin/users` resource.

use agrihub_core::error::CoreError;
use agrihub_core::roles::validate_role;
use agrihub_core::types::DbId;
use agrihub_db::models::user::{CreateUser, UpdateUser, User};
use agrihub_db::repositories::{SessionRepo, UserRepo};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{resolve_farm_scope, RequireManager};
use crate::query::ListParams;
use crate::response::{DataResponse, PagedResponse};
use crate::state::AppState;

/// POST /api/admin/users
///
/// Managers may only create accounts inside their own farm; admins anywhere.
pub async fn create(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Json(input): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<DataResponse<User>>)> {
    input.validate()?;
    validate_role(&input.role).map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    let farm_id = match input.farm_id {
        Some(farm_id) => Some(resolve_farm_scope(&user, Some(farm_id))?),
        None => {
            // A farm-less account is an unscoped admin; only admins may mint those.
            if user.role != agrihub_core::roles::ROLE_ADMIN {
                return Err(AppError::Core(CoreError::Forbidden(
                    "Only admins can create farm-less accounts".into(),
                )));
            }
            None
        }
    };

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

    let created = UserRepo::create(
        &state.pool,
        farm_id,
        &input.username,
        &input.email,
        &password_hash,
        &input.full_name,
        input.phone.as_deref(),
        &input.role,
    )
    .await?;

    tracing::info!(user_id = created.id, role = %created.role, "User created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /api/admin/users
pub async fn list(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Query(params): Query<ListParams>,
) -> AppResult<Json<PagedResponse<User>>> {
    let farm_id = resolve_farm_scope(&user, params.farm_id)?;
    let page = UserRepo::list(
        &state.pool,
        Some(farm_id),
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

/// GET /api/admin/users/{id}
pub async fn get(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<User>>> {
    let target = find_scoped(&state, &user, id).await?;
    Ok(Json(DataResponse { data: target }))
}

/// PUT /api/admin/users/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUser>,
) -> AppResult<Json<DataResponse<User>>> {
    input.validate()?;
    find_scoped(&state, &user, id).await?;

    let updated = UserRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    // Deactivation kills every live session immediately.
    if input.is_active == Some(false) {
        SessionRepo::revoke_all_for_user(&state.pool, id).await?;
        tracing::info!(user_id = id, "User deactivated, sessions revoked");
    }

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/admin/users/{id}
pub async fn remove(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if user.user_id == id {
        return Err(AppError::BadRequest("Cannot delete your own account".into()));
    }
    find_scoped(&state, &user, id).await?;

    UserRepo::soft_delete(&state.pool, id).await?;
    SessionRepo::revoke_all_for_user(&state.pool, id).await?;
    tracing::info!(user_id = id, "User soft-deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Load a user row and verify the caller may touch their farm.
async fn find_scoped(
    state: &AppState,
    user: &crate::middleware::auth::AuthUser,
    id: DbId,
) -> Result<User, AppError> {
    let target = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    if let Some(farm_id) = target.farm_id {
        resolve_farm_scope(user, Some(farm_id))?;
    } else if user.role != agrihub_core::roles::ROLE_ADMIN {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only admins can manage farm-less accounts".into(),
        )));
    }
    Ok(target)
}
