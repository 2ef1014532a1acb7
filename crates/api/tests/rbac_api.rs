//! Authentication and role enforcement across the route families.

mod common;

use agrihub_core::roles::{ROLE_ADMIN, ROLE_FARMER, ROLE_MANAGER};
use agrihub_db::repositories::NotificationRepo;
use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use common::{body_json, get, get_auth, seed_farm, seed_user, token_for};
use sqlx::PgPool;
use tower::ServiceExt;

#[sqlx::test(migrations = "../db/migrations")]
async fn test_health_is_public(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_missing_token_is_401(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app, "/api/admin/farms").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_garbage_token_is_401(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/admin/farms", "not.a.jwt").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_malformed_auth_header_is_401(pool: PgPool) {
    let app = common::build_test_app(pool);

    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/api/admin/farms")
        .header(AUTHORIZATION, "Basic dXNlcjpwYXNz")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Farm management is admin-only; a manager gets 403, not 401.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_manager_cannot_manage_farms(pool: PgPool) {
    let farm_id = seed_farm(&pool).await;
    let manager = seed_user(&pool, Some(farm_id), ROLE_MANAGER, "mgr").await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/admin/farms", &token_for(&manager)).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "FORBIDDEN");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_farmer_cannot_reach_back_office(pool: PgPool) {
    let farm_id = seed_farm(&pool).await;
    let farmer = seed_user(&pool, Some(farm_id), ROLE_FARMER, "farmer1").await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/admin/tasks", &token_for(&farmer)).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_can_list_farms(pool: PgPool) {
    seed_farm(&pool).await;
    let admin = seed_user(&pool, None, ROLE_ADMIN, "root").await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/admin/farms", &token_for(&admin)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["totalItem"], 1);
    assert_eq!(json["data"][0]["name"], "Green Acres");
}

/// Farm-scoped listings require the admin to name a farm explicitly.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_must_name_a_farm_for_scoped_lists(pool: PgPool) {
    let farm_id = seed_farm(&pool).await;
    let admin = seed_user(&pool, None, ROLE_ADMIN, "root").await;
    let app = common::build_test_app(pool);

    let response = get_auth(app.clone(), "/api/admin/gardens", &token_for(&admin)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get_auth(
        app,
        &format!("/api/admin/gardens?farm_id={farm_id}"),
        &token_for(&admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// A manager cannot read another farm's data by passing its id.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_manager_is_locked_to_own_farm(pool: PgPool) {
    let own_farm = seed_farm(&pool).await;
    let other_farm = seed_farm(&pool).await;
    let manager = seed_user(&pool, Some(own_farm), ROLE_MANAGER, "mgr").await;
    let app = common::build_test_app(pool);

    let response = get_auth(
        app,
        &format!("/api/admin/gardens?farm_id={other_farm}"),
        &token_for(&manager),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// The back-office notification list uses the admin envelope, not the
/// web `pagination` wrapper.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_notification_list_envelope(pool: PgPool) {
    let farm_id = seed_farm(&pool).await;
    let manager = seed_user(&pool, Some(farm_id), ROLE_MANAGER, "mgr").await;
    NotificationRepo::create(
        &pool,
        manager.id,
        "equipment_change.reviewed",
        "Change approved",
        "Import of 5 approved",
        Some("equipment_change"),
        Some(1),
    )
    .await
    .unwrap();
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/admin/notifications", &token_for(&manager)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["totalItem"], 1);
    assert_eq!(json["page"], 1);
    assert!(json.get("pagination").is_none());
    assert_eq!(json["data"][0]["title"], "Change approved");
}
