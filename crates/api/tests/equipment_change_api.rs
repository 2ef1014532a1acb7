//! HTTP-level tests for the equipment change approval workflow.

mod common;

use agrihub_core::roles::ROLE_MANAGER;
use agrihub_events::bus::EVENT_EQUIPMENT_CHANGE_REVIEWED;
use agrihub_events::EventBus;
use axum::http::StatusCode;
use common::{
    body_bytes, body_json, get_auth, post_json_auth, seed_category, seed_equipment, seed_farm,
    seed_user, token_for,
};
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn test_import_approval_over_http(pool: PgPool) {
    let farm_id = seed_farm(&pool).await;
    let category_id = seed_category(&pool).await;
    let equipment = seed_equipment(&pool, farm_id, category_id, 10).await;
    let manager = seed_user(&pool, Some(farm_id), ROLE_MANAGER, "mgr").await;
    let token = token_for(&manager);
    let app = common::build_test_app(pool.clone());

    let body = serde_json::json!({
        "equipment_id": equipment.id,
        "change_type": "import",
        "quantity": 5,
    });
    let response = post_json_auth(app.clone(), "/api/admin/equipment-changes", &token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "pending");
    let change_id = json["data"]["id"].as_i64().unwrap();

    let response = post_json_auth(
        app,
        &format!("/api/admin/equipment-changes/{change_id}/approve"),
        &token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "approved");

    let quantity: i32 = sqlx::query_scalar("SELECT quantity FROM equipment WHERE id = $1")
        .bind(equipment.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(quantity, 15);
}

/// An export larger than current stock is refused at creation time.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_overdrawn_export_request_is_400(pool: PgPool) {
    let farm_id = seed_farm(&pool).await;
    let category_id = seed_category(&pool).await;
    let equipment = seed_equipment(&pool, farm_id, category_id, 3).await;
    let manager = seed_user(&pool, Some(farm_id), ROLE_MANAGER, "mgr").await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "equipment_id": equipment.id,
        "change_type": "export",
        "quantity": 5,
    });
    let response = post_json_auth(
        app,
        "/api/admin/equipment-changes",
        &token_for(&manager),
        body,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_unknown_change_type_is_400(pool: PgPool) {
    let farm_id = seed_farm(&pool).await;
    let category_id = seed_category(&pool).await;
    let equipment = seed_equipment(&pool, farm_id, category_id, 10).await;
    let manager = seed_user(&pool, Some(farm_id), ROLE_MANAGER, "mgr").await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "equipment_id": equipment.id,
        "change_type": "teleport",
        "quantity": 1,
    });
    let response = post_json_auth(
        app,
        "/api/admin/equipment-changes",
        &token_for(&manager),
        body,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Rejecting requires a reason and leaves stock untouched.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_reject_over_http(pool: PgPool) {
    let farm_id = seed_farm(&pool).await;
    let category_id = seed_category(&pool).await;
    let equipment = seed_equipment(&pool, farm_id, category_id, 10).await;
    let manager = seed_user(&pool, Some(farm_id), ROLE_MANAGER, "mgr").await;
    let token = token_for(&manager);
    let app = common::build_test_app(pool.clone());

    let body = serde_json::json!({
        "equipment_id": equipment.id,
        "change_type": "export",
        "quantity": 2,
    });
    let response = post_json_auth(app.clone(), "/api/admin/equipment-changes", &token, body).await;
    let change_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    // Missing reason fails validation.
    let response = post_json_auth(
        app.clone(),
        &format!("/api/admin/equipment-changes/{change_id}/reject"),
        &token,
        serde_json::json!({ "reason": "" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(
        app,
        &format!("/api/admin/equipment-changes/{change_id}/reject"),
        &token,
        serde_json::json!({ "reason": "not needed this season" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "rejected");
    assert_eq!(json["data"]["reject_reason"], "not needed this season");

    let quantity: i32 = sqlx::query_scalar("SELECT quantity FROM equipment WHERE id = $1")
        .bind(equipment.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(quantity, 10);
}

/// The XLSX export returns a spreadsheet attachment.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_xlsx_export(pool: PgPool) {
    let farm_id = seed_farm(&pool).await;
    let category_id = seed_category(&pool).await;
    let equipment = seed_equipment(&pool, farm_id, category_id, 10).await;
    let manager = seed_user(&pool, Some(farm_id), ROLE_MANAGER, "mgr").await;
    let token = token_for(&manager);
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "equipment_id": equipment.id,
        "change_type": "import",
        "quantity": 5,
    });
    post_json_auth(app.clone(), "/api/admin/equipment-changes", &token, body).await;

    let response = get_auth(app, "/api/admin/equipment-changes/export", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    let bytes = body_bytes(response).await;
    // XLSX files are ZIP archives.
    assert_eq!(&bytes[..4], b"PK\x03\x04");
}

/// Reviewing a change publishes an event carrying the decision and the
/// quantity, so downstream consumers need no extra lookup.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_review_event_carries_decision_and_quantity(pool: PgPool) {
    let farm_id = seed_farm(&pool).await;
    let category_id = seed_category(&pool).await;
    let equipment = seed_equipment(&pool, farm_id, category_id, 10).await;
    let manager = seed_user(&pool, Some(farm_id), ROLE_MANAGER, "mgr").await;
    let token = token_for(&manager);
    let bus = std::sync::Arc::new(EventBus::default());
    let mut events = bus.subscribe();
    let app = common::build_test_app_with_bus(pool, bus);

    let body = serde_json::json!({
        "equipment_id": equipment.id,
        "change_type": "import",
        "quantity": 5,
    });
    let response = post_json_auth(app.clone(), "/api/admin/equipment-changes", &token, body).await;
    let change_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = post_json_auth(
        app,
        &format!("/api/admin/equipment-changes/{change_id}/approve"),
        &token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let event = events.recv().await.unwrap();
    assert_eq!(event.event_type, EVENT_EQUIPMENT_CHANGE_REVIEWED);
    assert_eq!(event.payload["status"], "approved");
    assert_eq!(event.payload["quantity"], 5);
    assert_eq!(event.payload["equipment_id"], equipment.id);
    assert_eq!(event.payload["created_by"], manager.id);
}
