//! HTTP-level tests for task assignment and farmer self-service.

mod common;

use agrihub_core::roles::{ROLE_FARMER, ROLE_MANAGER};
use axum::http::StatusCode;
use common::{
    body_json, delete_json_auth, get_auth, post_json_auth, put_json_auth, seed_farm, seed_garden,
    seed_task, seed_user, token_for,
};
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn test_assign_and_complete_over_http(pool: PgPool) {
    let farm_id = seed_farm(&pool).await;
    let garden_id = seed_garden(&pool, farm_id).await;
    let task = seed_task(&pool, farm_id, garden_id).await;
    let manager = seed_user(&pool, Some(farm_id), ROLE_MANAGER, "mgr").await;
    let farmer = seed_user(&pool, Some(farm_id), ROLE_FARMER, "farmer1").await;
    let app = common::build_test_app(pool);

    // Manager assigns the task.
    let response = post_json_auth(
        app.clone(),
        &format!("/api/admin/tasks/{}/assign", task.id),
        &token_for(&manager),
        serde_json::json!({ "farmer_id": farmer.id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "assigned");
    assert_eq!(json["data"]["farmer_id"], farmer.id);

    // The farmer sees it in their list.
    let response = get_auth(app.clone(), "/api/web/tasks", &token_for(&farmer)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["pagination"]["total"], 1);
    assert_eq!(json["data"][0]["id"], task.id);

    // And works it to completion.
    let response = put_json_auth(
        app.clone(),
        &format!("/api/web/tasks/{}/status", task.id),
        &token_for(&farmer),
        serde_json::json!({ "status": "in-progress" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = put_json_auth(
        app.clone(),
        &format!("/api/web/tasks/{}/status", task.id),
        &token_for(&farmer),
        serde_json::json!({ "status": "completed", "comment": "done before lunch" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "completed");

    // The manager sees the full transition history.
    let response = get_auth(
        app,
        &format!("/api/admin/tasks/{}/history", task.id),
        &token_for(&manager),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 3);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_assign_rejects_farmer_from_other_farm(pool: PgPool) {
    let farm_id = seed_farm(&pool).await;
    let other_farm = seed_farm(&pool).await;
    let garden_id = seed_garden(&pool, farm_id).await;
    let task = seed_task(&pool, farm_id, garden_id).await;
    let manager = seed_user(&pool, Some(farm_id), ROLE_MANAGER, "mgr").await;
    let outsider = seed_user(&pool, Some(other_farm), ROLE_FARMER, "outsider").await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        &format!("/api/admin/tasks/{}/assign", task.id),
        &token_for(&manager),
        serde_json::json!({ "farmer_id": outsider.id }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// A farmer cannot see or touch tasks assigned to someone else.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_other_farmers_tasks_are_hidden(pool: PgPool) {
    let farm_id = seed_farm(&pool).await;
    let garden_id = seed_garden(&pool, farm_id).await;
    let task = seed_task(&pool, farm_id, garden_id).await;
    let manager = seed_user(&pool, Some(farm_id), ROLE_MANAGER, "mgr").await;
    let farmer = seed_user(&pool, Some(farm_id), ROLE_FARMER, "farmer1").await;
    let other = seed_user(&pool, Some(farm_id), ROLE_FARMER, "farmer2").await;
    let app = common::build_test_app(pool);

    post_json_auth(
        app.clone(),
        &format!("/api/admin/tasks/{}/assign", task.id),
        &token_for(&manager),
        serde_json::json!({ "farmer_id": farmer.id }),
    )
    .await;

    let response = get_auth(
        app.clone(),
        &format!("/api/web/tasks/{}", task.id),
        &token_for(&other),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = put_json_auth(
        app,
        &format!("/api/web/tasks/{}/status", task.id),
        &token_for(&other),
        serde_json::json!({ "status": "in-progress" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_farmer_cannot_jump_to_staff_statuses(pool: PgPool) {
    let farm_id = seed_farm(&pool).await;
    let garden_id = seed_garden(&pool, farm_id).await;
    let task = seed_task(&pool, farm_id, garden_id).await;
    let manager = seed_user(&pool, Some(farm_id), ROLE_MANAGER, "mgr").await;
    let farmer = seed_user(&pool, Some(farm_id), ROLE_FARMER, "farmer1").await;
    let app = common::build_test_app(pool);

    post_json_auth(
        app.clone(),
        &format!("/api/admin/tasks/{}/assign", task.id),
        &token_for(&manager),
        serde_json::json!({ "farmer_id": farmer.id }),
    )
    .await;

    // "assigned" and "un-assign" are not farmer-settable statuses.
    let response = put_json_auth(
        app,
        &format!("/api/web/tasks/{}/status", task.id),
        &token_for(&farmer),
        serde_json::json!({ "status": "un-assign" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Deleting a task requires a reason and refuses completed tasks.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_remove_requires_reason_and_spares_completed(pool: PgPool) {
    let farm_id = seed_farm(&pool).await;
    let garden_id = seed_garden(&pool, farm_id).await;
    let task = seed_task(&pool, farm_id, garden_id).await;
    let manager = seed_user(&pool, Some(farm_id), ROLE_MANAGER, "mgr").await;
    let farmer = seed_user(&pool, Some(farm_id), ROLE_FARMER, "farmer1").await;
    let app = common::build_test_app(pool);

    // Empty reason fails validation.
    let response = delete_json_auth(
        app.clone(),
        &format!("/api/admin/tasks/{}", task.id),
        &token_for(&manager),
        serde_json::json!({ "reason": "" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Complete the task, then try to delete it.
    post_json_auth(
        app.clone(),
        &format!("/api/admin/tasks/{}/assign", task.id),
        &token_for(&manager),
        serde_json::json!({ "farmer_id": farmer.id }),
    )
    .await;
    put_json_auth(
        app.clone(),
        &format!("/api/web/tasks/{}/status", task.id),
        &token_for(&farmer),
        serde_json::json!({ "status": "completed" }),
    )
    .await;

    let response = delete_json_auth(
        app,
        &format!("/api/admin/tasks/{}", task.id),
        &token_for(&manager),
        serde_json::json!({ "reason": "duplicate entry" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_remove_soft_deletes(pool: PgPool) {
    let farm_id = seed_farm(&pool).await;
    let garden_id = seed_garden(&pool, farm_id).await;
    let task = seed_task(&pool, farm_id, garden_id).await;
    let manager = seed_user(&pool, Some(farm_id), ROLE_MANAGER, "mgr").await;
    let app = common::build_test_app(pool);

    let response = delete_json_auth(
        app.clone(),
        &format!("/api/admin/tasks/{}", task.id),
        &token_for(&manager),
        serde_json::json!({ "reason": "planted the wrong crop" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(
        app,
        &format!("/api/admin/tasks/{}", task.id),
        &token_for(&manager),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
