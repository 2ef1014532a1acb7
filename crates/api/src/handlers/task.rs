//! Handlers for tasks: back-office CRUD/assignment plus farmer self-service.

use agrihub_core::error::CoreError;
use agrihub_core::roles::ROLE_FARMER;
use agrihub_core::task::{validate_farmer_status, validate_priority, validate_task_type, PRIORITY_MEDIUM};
use agrihub_core::types::DbId;
use agrihub_db::models::task::{
    AssignFarmerRequest, ChangeStatusRequest, CreateTask, RemoveTaskRequest, Task, TaskHistory,
    TaskListFilter, UpdateTask,
};
use agrihub_db::repositories::task_repo::{AssignOutcome, RemoveOutcome, StatusOutcome};
use agrihub_db::repositories::{GardenRepo, TaskHistoryRepo, TaskRepo, UserRepo};
use agrihub_events::bus::{EVENT_TASK_ASSIGNED, EVENT_TASK_DELETED};
use agrihub_events::DomainEvent;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{resolve_farm_scope, RequireFarmer, RequireManager};
use crate::query::ListParams;
use crate::response::{DataResponse, PagedResponse, WebPagedResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Back-office handlers (/api/admin/tasks)
// ---------------------------------------------------------------------------

/// POST /api/admin/tasks
pub async fn create(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Json(input): Json<CreateTask>,
) -> AppResult<(StatusCode, Json<DataResponse<Task>>)> {
    input.validate()?;
    validate_task_type(&input.task_type).map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    let priority = match &input.priority {
        Some(p) => {
            validate_priority(p).map_err(|e| AppError::Core(CoreError::Validation(e)))?;
            p.as_str()
        }
        None => PRIORITY_MEDIUM,
    };

    // The garden decides the farm; it must be one the caller controls.
    let garden = GardenRepo::find_by_id(&state.pool, input.garden_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Garden",
            id: input.garden_id,
        }))?;
    let farm_id = resolve_farm_scope(&user, Some(garden.farm_id))?;

    let task = TaskRepo::create(&state.pool, farm_id, &input, priority).await?;
    tracing::info!(task_id = task.id, farm_id, "Task created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: task })))
}

/// GET /api/admin/tasks
pub async fn list(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Query(params): Query<ListParams>,
    Query(filter): Query<TaskListFilter>,
) -> AppResult<Json<PagedResponse<Task>>> {
    let farm_id = resolve_farm_scope(&user, params.farm_id)?;
    let page = TaskRepo::list_for_farm(
        &state.pool,
        farm_id,
        &filter,
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

/// GET /api/admin/tasks/{id}
pub async fn get(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Task>>> {
    let task = find_scoped(&state, &user, id).await?;
    Ok(Json(DataResponse { data: task }))
}

/// GET /api/admin/tasks/{id}/history
pub async fn history(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<TaskHistory>>>> {
    find_scoped(&state, &user, id).await?;
    let rows = TaskHistoryRepo::list_for_task(&state.pool, id).await?;
    Ok(Json(DataResponse { data: rows }))
}

/// PUT /api/admin/tasks/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTask>,
) -> AppResult<Json<DataResponse<Task>>> {
    input.validate()?;
    if let Some(priority) = &input.priority {
        validate_priority(priority).map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    }
    find_scoped(&state, &user, id).await?;

    let task = TaskRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))?;
    Ok(Json(DataResponse { data: task }))
}

/// POST /api/admin/tasks/{id}/assign
pub async fn assign(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
    Json(input): Json<AssignFarmerRequest>,
) -> AppResult<Json<DataResponse<Task>>> {
    let task = find_scoped(&state, &user, id).await?;

    // The assignee must be an active farmer of the same farm.
    let farmer = UserRepo::find_active_with_role(&state.pool, input.farmer_id, ROLE_FARMER)
        .await?
        .ok_or_else(|| {
            AppError::BadRequest(format!("User {} is not an active farmer", input.farmer_id))
        })?;
    if farmer.farm_id != Some(task.farm_id) {
        return Err(AppError::BadRequest(
            "Farmer belongs to a different farm".into(),
        ));
    }

    let outcome = TaskRepo::assign_farmer(&state.pool, id, input.farmer_id).await?;
    let task = match outcome {
        AssignOutcome::Assigned(task) => task,
        AssignOutcome::TaskMissing => {
            return Err(AppError::Core(CoreError::NotFound { entity: "Task", id }))
        }
        AssignOutcome::AlreadyAssigned | AssignOutcome::Raced => {
            return Err(AppError::BadRequest(
                "Task already has an assigned farmer".into(),
            ))
        }
        AssignOutcome::Completed => {
            return Err(AppError::BadRequest("Task is already completed".into()))
        }
    };

    tracing::info!(task_id = id, farmer_id = input.farmer_id, "Task assigned");
    state.event_bus.publish(
        DomainEvent::new(EVENT_TASK_ASSIGNED)
            .with_source("task", task.id)
            .with_actor(user.user_id)
            .with_payload(json!({
                "farmer_id": input.farmer_id,
                "name": task.name,
            })),
    );
    Ok(Json(DataResponse { data: task }))
}

/// DELETE /api/admin/tasks/{id}
///
/// Soft delete with a mandatory reason; completed tasks are frozen.
pub async fn remove(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
    Json(input): Json<RemoveTaskRequest>,
) -> AppResult<StatusCode> {
    input.validate()?;
    find_scoped(&state, &user, id).await?;

    let outcome = TaskRepo::soft_delete(&state.pool, id, user.user_id, &input.reason).await?;
    let task = match outcome {
        RemoveOutcome::Removed(task) => task,
        RemoveOutcome::TaskMissing => {
            return Err(AppError::Core(CoreError::NotFound { entity: "Task", id }))
        }
        RemoveOutcome::Completed => {
            return Err(AppError::BadRequest(
                "Completed tasks cannot be deleted".into(),
            ))
        }
    };

    tracing::info!(task_id = id, reason = %input.reason, "Task soft-deleted");
    state.event_bus.publish(
        DomainEvent::new(EVENT_TASK_DELETED)
            .with_source("task", id)
            .with_actor(user.user_id)
            .with_payload(json!({
                "farmer_id": task.farmer_id,
                "reason": input.reason,
            })),
    );
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Self-service handlers (/api/web/tasks)
// ---------------------------------------------------------------------------

/// Extra query parameters for the farmer's own task list.
#[derive(Debug, Default, Deserialize)]
pub struct MyTaskFilter {
    pub status: Option<String>,
}

/// GET /api/web/tasks
///
/// The authenticated farmer's own tasks.
pub async fn list_mine(
    State(state): State<AppState>,
    RequireFarmer(user): RequireFarmer,
    Query(params): Query<ListParams>,
    Query(filter): Query<MyTaskFilter>,
) -> AppResult<Json<WebPagedResponse<Task>>> {
    let page = TaskRepo::list_for_farmer(
        &state.pool,
        user.user_id,
        filter.status.as_deref(),
        params.page,
        params.page_size,
    )
    .await?;
    Ok(Json(WebPagedResponse::new(
        page.items,
        page.total,
        params.page(),
        params.page_size(),
    )))
}

/// GET /api/web/tasks/{id}
pub async fn get_mine(
    State(state): State<AppState>,
    RequireFarmer(user): RequireFarmer,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Task>>> {
    let task = find_assigned(&state, &user, id).await?;
    Ok(Json(DataResponse { data: task }))
}

/// PUT /api/web/tasks/{id}/status
///
/// Farmer self-service transition to `in-progress`, `completed`, or
/// `canceled`, valid only from `assigned`/`in-progress`.
pub async fn change_status(
    State(state): State<AppState>,
    RequireFarmer(user): RequireFarmer,
    Path(id): Path<DbId>,
    Json(input): Json<ChangeStatusRequest>,
) -> AppResult<Json<DataResponse<Task>>> {
    validate_farmer_status(&input.status).map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    let outcome = TaskRepo::change_status_assigned(
        &state.pool,
        id,
        user.user_id,
        &input.status,
        input.comment.as_deref(),
    )
    .await?;

    let task = match outcome {
        StatusOutcome::Changed(task) => task,
        StatusOutcome::NotAssignedToFarmer => {
            return Err(AppError::Core(CoreError::NotFound { entity: "Task", id }))
        }
        StatusOutcome::InvalidState(current) => {
            return Err(AppError::BadRequest(format!(
                "Cannot change status of a {current} task"
            )))
        }
    };

    tracing::info!(task_id = id, status = %task.status, "Task status changed");
    Ok(Json(DataResponse { data: task }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a task and verify the caller may touch its farm.
async fn find_scoped(state: &AppState, user: &AuthUser, id: DbId) -> Result<Task, AppError> {
    let task = TaskRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))?;
    resolve_farm_scope(user, Some(task.farm_id))?;
    Ok(task)
}

/// Load a task and verify it is assigned to the calling farmer.
async fn find_assigned(state: &AppState, user: &AuthUser, id: DbId) -> Result<Task, AppError> {
    let task = TaskRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))?;
    if task.farmer_id != Some(user.user_id) {
        // Hide other farms' tasks entirely.
        return Err(AppError::Core(CoreError::NotFound { entity: "Task", id }));
    }
    Ok(task)
}
