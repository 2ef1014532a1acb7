//! Handlers for Q&A threads (`/api/web/questions`).
//!
//! Farmers open threads on their farm; the farm's managers and linked
//! experts answer. Both sides are notified through the event bus.

use agrihub_core::error::CoreError;
use agrihub_core::roles::{ROLE_ADMIN, ROLE_EXPERT, ROLE_FARMER, ROLE_MANAGER};
use agrihub_core::types::DbId;
use agrihub_db::models::question::{
    CreateAnswer, CreateQuestion, Question, QuestionAnswer, QuestionWithAnswers,
};
use agrihub_db::repositories::{ExpertFarmRepo, QuestionRepo};
use agrihub_events::bus::{EVENT_QUESTION_ANSWERED, EVENT_QUESTION_CREATED};
use agrihub_events::DomainEvent;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::ListParams;
use crate::response::{DataResponse, WebPagedResponse};
use crate::state::AppState;

/// POST /api/web/questions
///
/// Farmers (and managers) open threads on their own farm.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateQuestion>,
) -> AppResult<(StatusCode, Json<DataResponse<Question>>)> {
    input.validate()?;

    let farm_id = user.farm_id.ok_or_else(|| {
        AppError::Core(CoreError::Forbidden(
            "Account is not associated with a farm".into(),
        ))
    })?;

    let question =
        QuestionRepo::create(&state.pool, farm_id, user.user_id, &input.title, &input.content)
            .await?;

    tracing::info!(question_id = question.id, farm_id, "Question created");
    state.event_bus.publish(
        DomainEvent::new(EVENT_QUESTION_CREATED)
            .with_source("question", question.id)
            .with_actor(user.user_id)
            .with_payload(json!({
                "farm_id": farm_id,
                "title": question.title,
            })),
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: question })))
}

/// GET /api/web/questions
///
/// Threads on the caller's farm. Experts see the farms they advise via
/// the `farm_id` query parameter.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<ListParams>,
) -> AppResult<Json<WebPagedResponse<Question>>> {
    let farm_id = accessible_farm(&state, &user, params.farm_id).await?;
    let page = QuestionRepo::list_for_farm(
        &state.pool,
        farm_id,
        params.keyword(),
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

/// GET /api/web/questions/{id}
pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<QuestionWithAnswers>>> {
    let question = find_accessible(&state, &user, id).await?;
    let answers = QuestionRepo::list_answers(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: QuestionWithAnswers { question, answers },
    }))
}

/// POST /api/web/questions/{id}/answers
///
/// Experts linked to the farm, the farm's managers, and admins may answer.
pub async fn answer(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<CreateAnswer>,
) -> AppResult<(StatusCode, Json<DataResponse<QuestionAnswer>>)> {
    input.validate()?;
    let question = find_accessible(&state, &user, id).await?;

    if user.role == ROLE_FARMER && question.created_by != user.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Farmers may only reply on their own threads".into(),
        )));
    }

    let answer = QuestionRepo::add_answer(&state.pool, id, user.user_id, &input.content).await?;

    tracing::info!(question_id = id, answer_id = answer.id, "Question answered");
    state.event_bus.publish(
        DomainEvent::new(EVENT_QUESTION_ANSWERED)
            .with_source("question", id)
            .with_actor(user.user_id)
            .with_payload(json!({
                "author_id": question.created_by,
                "title": question.title,
            })),
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: answer })))
}

/// DELETE /api/web/questions/{id}
///
/// Only the author or a manager/admin of the farm may remove a thread.
pub async fn remove(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let question = find_accessible(&state, &user, id).await?;

    let is_author = question.created_by == user.user_id;
    let is_staff = user.role == ROLE_ADMIN || user.role == ROLE_MANAGER;
    if !is_author && !is_staff {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the author or farm staff can delete a question".into(),
        )));
    }

    QuestionRepo::soft_delete(&state.pool, id).await?;
    tracing::info!(question_id = id, "Question soft-deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve a farm the caller may read Q&A threads of.
///
/// Members use their own farm; experts name one of their advised farms;
/// admins name any farm.
async fn accessible_farm(
    state: &AppState,
    user: &AuthUser,
    requested: Option<DbId>,
) -> Result<DbId, AppError> {
    if user.role == ROLE_ADMIN {
        return requested
            .ok_or_else(|| AppError::BadRequest("farm_id query parameter is required".into()));
    }

    if user.role == ROLE_EXPERT {
        let farm_id = requested
            .ok_or_else(|| AppError::BadRequest("farm_id query parameter is required".into()))?;
        if !ExpertFarmRepo::is_linked(&state.pool, user.user_id, farm_id).await? {
            return Err(AppError::Core(CoreError::Forbidden(
                "You do not advise this farm".into(),
            )));
        }
        return Ok(farm_id);
    }

    let own = user.farm_id.ok_or_else(|| {
        AppError::Core(CoreError::Forbidden(
            "Account is not associated with a farm".into(),
        ))
    })?;
    match requested {
        Some(requested) if requested != own => Err(AppError::Core(CoreError::Forbidden(
            "Cannot access another farm's questions".into(),
        ))),
        _ => Ok(own),
    }
}

/// Load a question and verify the caller may access its farm.
async fn find_accessible(state: &AppState, user: &AuthUser, id: DbId) -> Result<Question, AppError> {
    let question = QuestionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Question",
            id,
        }))?;
    accessible_farm(state, user, Some(question.farm_id)).await?;
    Ok(question)
}
