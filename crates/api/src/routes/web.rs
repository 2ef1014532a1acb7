//! Route definitions for the self-service family (`/api/web`).

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{advisor, daily_note, news, notification, question, task, weather};
use crate::state::AppState;
use crate::uploads;

/// Routes mounted at `/api/web`.
///
/// ```text
/// /tasks                             my assigned tasks (farmer)
/// /tasks/{id}                        one of my tasks
/// /tasks/{id}/status                 self-service status change (PUT)
/// /tasks/{id}/notes                  daily notes: list, create
/// /notes/{id}                        note detail with consumption lines
///
/// /questions                         list, create
/// /questions/{id}                    detail with answers, delete
/// /questions/{id}/answers            answer (POST)
///
/// /news                              read-only feed
/// /notifications                     my notifications
/// /weather                           forecast proxy
/// /advisor                           AI advisor prompt (POST)
/// /uploads/{folder}                  multipart image upload
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        // Farmer task self-service.
        .route("/tasks", get(task::list_mine))
        .route("/tasks/{id}", get(task::get_mine))
        .route("/tasks/{id}/status", put(task::change_status))
        .route(
            "/tasks/{id}/notes",
            get(daily_note::list).post(daily_note::create),
        )
        .route("/notes/{id}", get(daily_note::get))
        // Q&A threads.
        .route("/questions", get(question::list).post(question::create))
        .route(
            "/questions/{id}",
            get(question::get).delete(question::remove),
        )
        .route("/questions/{id}/answers", post(question::answer))
        // Shared read surfaces.
        .route("/news", get(news::list_web))
        .route("/notifications", get(notification::list))
        .route(
            "/notifications/unread-count",
            get(notification::unread_count),
        )
        .route("/notifications/read-all", put(notification::mark_all_read))
        .route("/notifications/{id}/read", put(notification::mark_read))
        // Integrations.
        .route("/weather", get(weather::forecast))
        .route("/advisor", post(advisor::advise))
        // Image uploads.
        .route("/uploads/{folder}", post(uploads::upload_image))
}
