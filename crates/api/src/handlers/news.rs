//! Handlers for the news feed: admin publishing plus a public-ish web list.

use agrihub_core::error::CoreError;
use agrihub_core::types::DbId;
use agrihub_db::models::news::{CreateNews, News, UpdateNews};
use agrihub_db::repositories::NewsRepo;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::ListParams;
use crate::response::{DataResponse, PagedResponse, WebPagedResponse};
use crate::state::AppState;

/// POST /api/admin/news
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Json(input): Json<CreateNews>,
) -> AppResult<(StatusCode, Json<DataResponse<News>>)> {
    input.validate()?;
    let news = NewsRepo::create(&state.pool, user.user_id, &input).await?;
    tracing::info!(news_id = news.id, "News published");
    Ok((StatusCode::CREATED, Json(DataResponse { data: news })))
}

/// GET /api/admin/news
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Query(params): Query<ListParams>,
) -> AppResult<Json<PagedResponse<News>>> {
    let page = NewsRepo::list(&state.pool, params.keyword(), params.page, params.page_size)
        .await?;
    Ok(Json(PagedResponse::new(
        page.items,
        page.total,
        params.page(),
        params.page_size(),
    )))
}

/// GET /api/admin/news/{id}
pub async fn get(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<News>>> {
    let news = NewsRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "News", id }))?;
    Ok(Json(DataResponse { data: news }))
}

/// PUT /api/admin/news/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateNews>,
) -> AppResult<Json<DataResponse<News>>> {
    input.validate()?;
    let news = NewsRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "News", id }))?;
    Ok(Json(DataResponse { data: news }))
}

/// DELETE /api/admin/news/{id}
pub async fn remove(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = NewsRepo::soft_delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound { entity: "News", id }));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/web/news
///
/// Read-only feed for any authenticated user.
pub async fn list_web(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<ListParams>,
) -> AppResult<Json<WebPagedResponse<News>>> {
    let page = NewsRepo::list(&state.pool, params.keyword(), params.page, params.page_size)
        .await?;
    Ok(Json(WebPagedResponse::new(
        page.items,
        page.total,
        params.page(),
        params.page_size(),
    )))
}
