//! Handlers for the `/admin/equipment-changes` resource.
//!
//! Covers the import/export approval workflow plus the XLSX export of a
//! farm's change history.

use agrihub_core::equipment_change::{
    check_export_stock, validate_change_quantity, validate_change_type, CHANGE_EXPORT,
};
use agrihub_core::error::CoreError;
use agrihub_core::types::DbId;
use agrihub_db::models::equipment_change::{
    CreateEquipmentChange, EquipmentChange, EquipmentChangeRow, RejectEquipmentChange,
};
use agrihub_db::repositories::equipment_change_repo::ReviewOutcome;
use agrihub_db::repositories::{EquipmentChangeRepo, EquipmentRepo};
use agrihub_events::bus::EVENT_EQUIPMENT_CHANGE_REVIEWED;
use agrihub_events::DomainEvent;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{resolve_farm_scope, RequireManager};
use crate::query::ListParams;
use crate::report::equipment_change_report;
use crate::response::{DataResponse, PagedResponse};
use crate::state::AppState;

/// Extra query parameters for change listing.
#[derive(Debug, Default, Deserialize)]
pub struct ChangeFilter {
    pub status: Option<String>,
}

/// POST /api/admin/equipment-changes
///
/// Export requests are pre-checked against current stock so an obviously
/// overdrawn request fails immediately; the approve transaction re-checks
/// against the then-current quantity anyway.
pub async fn create(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Json(input): Json<CreateEquipmentChange>,
) -> AppResult<(StatusCode, Json<DataResponse<EquipmentChange>>)> {
    input.validate()?;
    validate_change_type(&input.change_type)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    validate_change_quantity(input.quantity)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    let equipment = EquipmentRepo::find_by_id(&state.pool, input.equipment_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Equipment",
            id: input.equipment_id,
        }))?;
    let farm_id = resolve_farm_scope(&user, Some(equipment.farm_id))?;

    if input.change_type == CHANGE_EXPORT {
        check_export_stock(equipment.quantity, input.quantity)
            .map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    }

    let change = EquipmentChangeRepo::create(
        &state.pool,
        farm_id,
        input.equipment_id,
        &input.change_type,
        input.quantity,
        user.user_id,
    )
    .await?;

    tracing::info!(
        change_id = change.id,
        change_type = %change.change_type,
        quantity = change.quantity,
        "Equipment change requested"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: change })))
}

/// GET /api/admin/equipment-changes
pub async fn list(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Query(params): Query<ListParams>,
    Query(filter): Query<ChangeFilter>,
) -> AppResult<Json<PagedResponse<EquipmentChangeRow>>> {
    let farm_id = resolve_farm_scope(&user, params.farm_id)?;
    let page = EquipmentChangeRepo::list_for_farm(
        &state.pool,
        farm_id,
        filter.status.as_deref(),
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

/// POST /api/admin/equipment-changes/{id}/approve
pub async fn approve(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<EquipmentChange>>> {
    scope_change(&state, &user, id).await?;

    let outcome = EquipmentChangeRepo::approve(&state.pool, id, user.user_id).await?;
    let change = map_review_outcome(outcome, id)?;

    tracing::info!(change_id = id, reviewer = user.user_id, "Equipment change approved");
    publish_reviewed(&state, &user, &change);
    Ok(Json(DataResponse { data: change }))
}

/// POST /api/admin/equipment-changes/{id}/reject
pub async fn reject(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
    Json(input): Json<RejectEquipmentChange>,
) -> AppResult<Json<DataResponse<EquipmentChange>>> {
    input.validate()?;
    scope_change(&state, &user, id).await?;

    let outcome = EquipmentChangeRepo::reject(&state.pool, id, &input.reason, user.user_id).await?;
    let change = map_review_outcome(outcome, id)?;

    tracing::info!(change_id = id, reviewer = user.user_id, "Equipment change rejected");
    publish_reviewed(&state, &user, &change);
    Ok(Json(DataResponse { data: change }))
}

/// GET /api/admin/equipment-changes/export
///
/// Streams the farm's full change history as an XLSX attachment.
pub async fn export(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let farm_id = resolve_farm_scope(&user, params.farm_id)?;
    let rows = EquipmentChangeRepo::export_rows(&state.pool, farm_id).await?;
    let bytes = equipment_change_report(&rows)
        .map_err(|e| AppError::InternalError(format!("Report generation failed: {e}")))?;

    Ok((
        [
            (
                header::CONTENT_TYPE,
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            ),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"equipment-changes.xlsx\"",
            ),
        ],
        bytes,
    ))
}

/// Verify the change belongs to a farm the caller controls.
async fn scope_change(state: &AppState, user: &AuthUser, id: DbId) -> Result<(), AppError> {
    let change = EquipmentChangeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "EquipmentChange",
            id,
        }))?;
    resolve_farm_scope(user, Some(change.farm_id))?;
    Ok(())
}

/// Translate a repository review outcome into a response or error.
fn map_review_outcome(outcome: ReviewOutcome, id: DbId) -> Result<EquipmentChange, AppError> {
    match outcome {
        ReviewOutcome::Done(change) => Ok(change),
        ReviewOutcome::ChangeMissing => Err(AppError::Core(CoreError::NotFound {
            entity: "EquipmentChange",
            id,
        })),
        ReviewOutcome::NotPending(status) => Err(AppError::BadRequest(format!(
            "Change is already {status}; only pending changes can be reviewed"
        ))),
        ReviewOutcome::EquipmentMissing => Err(AppError::BadRequest(
            "The equipment for this change no longer exists".into(),
        )),
        ReviewOutcome::InsufficientStock { available } => {
            Err(AppError::Core(CoreError::Validation(format!(
                "Insufficient quantity: requested more than available {available}"
            ))))
        }
    }
}

/// Publish the review event for notification fan-out and the event log.
fn publish_reviewed(state: &AppState, user: &AuthUser, change: &EquipmentChange) {
    state.event_bus.publish(
        DomainEvent::new(EVENT_EQUIPMENT_CHANGE_REVIEWED)
            .with_source("equipment_change", change.id)
            .with_actor(user.user_id)
            .with_payload(json!({
                "created_by": change.created_by,
                "status": change.status,
                "reject_reason": change.reject_reason,
                "equipment_id": change.equipment_id,
                "quantity": change.quantity,
            })),
    );
}
