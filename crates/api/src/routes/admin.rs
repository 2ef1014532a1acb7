//! Route definitions for the back-office family (`/api/admin`).

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{
    equipment, equipment_category, equipment_change, farm, garden, news, notification, task, user,
};
use crate::state::AppState;
use crate::uploads;

/// Routes mounted at `/api/admin`.
///
/// ```text
/// /farms                                   list, create (admin only)
/// /farms/{id}                              get, update, delete
///
/// /gardens                                 list, create
/// /gardens/{id}                            get, update, delete
///
/// /users                                   list, create
/// /users/{id}                              get, update, delete
///
/// /equipment-categories                    list, create (create admin only)
/// /equipment-categories/{id}               get, update, delete (admin only)
///
/// /equipments                              list, create
/// /equipments/{id}                         get, update, delete
///
/// /equipment-changes                       list, create
/// /equipment-changes/export                XLSX download
/// /equipment-changes/{id}/approve          approve (POST)
/// /equipment-changes/{id}/reject           reject (POST)
///
/// /tasks                                   list, create
/// /tasks/{id}                              get, update, delete (with reason)
/// /tasks/{id}/history                      audit trail
/// /tasks/{id}/assign                       assign farmer (POST)
///
/// /news                                    list, create (admin only)
/// /news/{id}                               get, update, delete
///
/// /notifications                           my notifications
/// /uploads/{folder}                        multipart image upload
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        // Farms (admin only, enforced in handlers).
        .route("/farms", get(farm::list).post(farm::create))
        .route(
            "/farms/{id}",
            get(farm::get).put(farm::update).delete(farm::remove),
        )
        // Gardens.
        .route("/gardens", get(garden::list).post(garden::create))
        .route(
            "/gardens/{id}",
            get(garden::get).put(garden::update).delete(garden::remove),
        )
        // Users.
        .route("/users", get(user::list).post(user::create))
        .route(
            "/users/{id}",
            get(user::get).put(user::update).delete(user::remove),
        )
        // Equipment categories.
        .route(
            "/equipment-categories",
            get(equipment_category::list).post(equipment_category::create),
        )
        .route(
            "/equipment-categories/{id}",
            get(equipment_category::get)
                .put(equipment_category::update)
                .delete(equipment_category::remove),
        )
        // Equipment.
        .route("/equipments", get(equipment::list).post(equipment::create))
        .route(
            "/equipments/{id}",
            get(equipment::get)
                .put(equipment::update)
                .delete(equipment::remove),
        )
        // Equipment change workflow.
        .route(
            "/equipment-changes",
            get(equipment_change::list).post(equipment_change::create),
        )
        .route("/equipment-changes/export", get(equipment_change::export))
        .route(
            "/equipment-changes/{id}/approve",
            post(equipment_change::approve),
        )
        .route(
            "/equipment-changes/{id}/reject",
            post(equipment_change::reject),
        )
        // Tasks.
        .route("/tasks", get(task::list).post(task::create))
        .route(
            "/tasks/{id}",
            get(task::get).put(task::update).delete(task::remove),
        )
        .route("/tasks/{id}/history", get(task::history))
        .route("/tasks/{id}/assign", post(task::assign))
        // News (admin only, enforced in handlers).
        .route("/news", get(news::list).post(news::create))
        .route(
            "/news/{id}",
            get(news::get).put(news::update).delete(news::remove),
        )
        // Notifications for back-office users.
        .route("/notifications", get(notification::list_admin))
        .route(
            "/notifications/unread-count",
            get(notification::unread_count),
        )
        .route("/notifications/read-all", put(notification::mark_all_read))
        .route("/notifications/{id}/read", put(notification::mark_read))
        // Image uploads.
        .route("/uploads/{folder}", post(uploads::upload_image))
}
