//! Handlers for farmer daily notes (`/api/web/tasks/{id}/notes`).

use agrihub_core::daily_note::{
    validate_consumption_lines, validate_note_type, NOTE_CONSUMPTION, NOTE_HARVEST,
};
use agrihub_core::error::CoreError;
use agrihub_core::types::DbId;
use agrihub_db::models::daily_note::{CreateDailyNote, DailyNoteWithLines, TaskDailyNote};
use agrihub_db::repositories::daily_note_repo::DailyNoteOutcome;
use agrihub_db::repositories::{DailyNoteRepo, TaskRepo};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireFarmer;
use crate::query::ListParams;
use crate::response::{DataResponse, WebPagedResponse};
use crate::state::AppState;

/// POST /api/web/tasks/{task_id}/notes
///
/// Harvest notes record a quantity; consumption notes atomically decrement
/// equipment stock for every listed line, or fail without writing anything.
pub async fn create(
    State(state): State<AppState>,
    RequireFarmer(user): RequireFarmer,
    Path(task_id): Path<DbId>,
    Json(input): Json<CreateDailyNote>,
) -> AppResult<(StatusCode, Json<DataResponse<TaskDailyNote>>)> {
    input.validate()?;
    validate_note_type(&input.note_type).map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    match input.note_type.as_str() {
        NOTE_HARVEST => {
            if input.harvest_quantity.is_none() {
                return Err(AppError::BadRequest(
                    "Harvest notes require harvest_quantity".into(),
                ));
            }
        }
        NOTE_CONSUMPTION => {
            validate_consumption_lines(&input.equipment)
                .map_err(|e| AppError::Core(CoreError::Validation(e)))?;
        }
        _ => unreachable!("validate_note_type covers the variants"),
    }

    // Only the assigned farmer can attach notes to a task.
    require_assigned(&state, &user, task_id).await?;

    let outcome = DailyNoteRepo::create(
        &state.pool,
        task_id,
        user.user_id,
        &input.note_type,
        input.comment.as_deref(),
        input.harvest_quantity,
        &input.equipment,
    )
    .await?;

    let note = match outcome {
        DailyNoteOutcome::Created(note) => note,
        DailyNoteOutcome::EquipmentMissing { equipment_id } => {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "Equipment",
                id: equipment_id,
            }))
        }
        DailyNoteOutcome::InsufficientStock {
            equipment_id,
            available,
        } => {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Insufficient quantity for equipment {equipment_id}: available {available}"
            ))))
        }
    };

    tracing::info!(note_id = note.id, task_id, note_type = %note.note_type, "Daily note created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: note })))
}

/// GET /api/web/tasks/{task_id}/notes
pub async fn list(
    State(state): State<AppState>,
    RequireFarmer(user): RequireFarmer,
    Path(task_id): Path<DbId>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<WebPagedResponse<TaskDailyNote>>> {
    require_assigned(&state, &user, task_id).await?;
    let page =
        DailyNoteRepo::list_for_task(&state.pool, task_id, params.page, params.page_size).await?;
    Ok(Json(WebPagedResponse::new(
        page.items,
        page.total,
        params.page(),
        params.page_size(),
    )))
}

/// GET /api/web/notes/{id}
pub async fn get(
    State(state): State<AppState>,
    RequireFarmer(user): RequireFarmer,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DailyNoteWithLines>>> {
    let note = DailyNoteRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "DailyNote",
            id,
        }))?;
    if note.farmer_id != user.user_id {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "DailyNote",
            id,
        }));
    }

    let equipment = DailyNoteRepo::lines_for_note(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: DailyNoteWithLines { note, equipment },
    }))
}

/// Verify a live task exists and is assigned to the calling farmer.
async fn require_assigned(state: &AppState, user: &AuthUser, task_id: DbId) -> Result<(), AppError> {
    let task = TaskRepo::find_by_id(&state.pool, task_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Task",
            id: task_id,
        }))?;
    if task.farmer_id != Some(user.user_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Task is not assigned to you".into(),
        )));
    }
    Ok(())
}
