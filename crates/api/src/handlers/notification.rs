//! Handlers for per-user notifications.
//!
//! Mounted under both families; every endpoint operates strictly on the
//! authenticated user's own rows.

use agrihub_core::error::CoreError;
use agrihub_core::types::DbId;
use agrihub_db::models::notification::Notification;
use agrihub_db::repositories::NotificationRepo;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::ListParams;
use crate::response::{DataResponse, PagedResponse, WebPagedResponse};
use crate::state::AppState;

/// Extra query parameters for notification listing.
#[derive(Debug, Default, Deserialize)]
pub struct NotificationFilter {
    #[serde(default)]
    pub unread_only: bool,
}

/// Response payload for the unread counter.
#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub count: i64,
}

/// GET /api/web/notifications
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<ListParams>,
    Query(filter): Query<NotificationFilter>,
) -> AppResult<Json<WebPagedResponse<Notification>>> {
    let page = NotificationRepo::list_for_user(
        &state.pool,
        user.user_id,
        filter.unread_only,
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

/// GET /api/admin/notifications
///
/// Same rows as the web list, wrapped in the back-office envelope.
pub async fn list_admin(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<ListParams>,
    Query(filter): Query<NotificationFilter>,
) -> AppResult<Json<PagedResponse<Notification>>> {
    let page = NotificationRepo::list_for_user(
        &state.pool,
        user.user_id,
        filter.unread_only,
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

/// GET /api/web/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<UnreadCount>>> {
    let count = NotificationRepo::unread_count(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse {
        data: UnreadCount { count },
    }))
}

/// PUT /api/web/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let marked = NotificationRepo::mark_read(&state.pool, id, user.user_id).await?;
    if !marked {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Notification",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/web/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<UnreadCount>>> {
    let marked = NotificationRepo::mark_all_read(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse {
        data: UnreadCount {
            count: marked as i64,
        },
    }))
}
