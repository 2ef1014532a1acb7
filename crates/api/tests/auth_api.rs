//! HTTP-level integration tests for the auth endpoints.
//!
//! Covers login, refresh-token rotation, and logout.

mod common;

use agrihub_core::roles::{ROLE_ADMIN, ROLE_MANAGER};
use axum::http::StatusCode;
use common::{body_json, post_json, post_json_auth, seed_farm, seed_user, TEST_PASSWORD};
use sqlx::PgPool;

/// Log in via the API and return the parsed JSON response.
async fn login(app: axum::Router, username: &str, password: &str) -> serde_json::Value {
    let body = serde_json::json!({ "username": username, "password": password });
    let response = post_json(app, "/api/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_success(pool: PgPool) {
    let farm_id = seed_farm(&pool).await;
    let user = seed_user(&pool, Some(farm_id), ROLE_MANAGER, "loginuser").await;
    let app = common::build_test_app(pool);

    let json = login(app, "loginuser", TEST_PASSWORD).await;

    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert!(json["expires_in"].is_number());
    assert_eq!(json["user"]["id"], user.id);
    assert_eq!(json["user"]["username"], "loginuser");
    assert_eq!(json["user"]["role"], ROLE_MANAGER);
    assert_eq!(json["user"]["farm_id"], farm_id);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_wrong_password(pool: PgPool) {
    let farm_id = seed_farm(&pool).await;
    seed_user(&pool, Some(farm_id), ROLE_MANAGER, "wrongpw").await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "username": "wrongpw", "password": "incorrect_password" });
    let response = post_json(app, "/api/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_nonexistent_user(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "username": "ghost", "password": "whatever" });
    let response = post_json(app, "/api/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_inactive_user(pool: PgPool) {
    let user = seed_user(&pool, None, ROLE_ADMIN, "inactive").await;
    sqlx::query("UPDATE users SET is_active = FALSE WHERE id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "username": "inactive", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Refresh rotates the session: new tokens are issued and the old refresh
/// token is dead.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_refresh_rotates_token(pool: PgPool) {
    seed_user(&pool, None, ROLE_ADMIN, "refresher").await;
    let app = common::build_test_app(pool);

    let login_json = login(app.clone(), "refresher", TEST_PASSWORD).await;
    let refresh_token = login_json["refresh_token"].as_str().unwrap();

    let body = serde_json::json!({ "refresh_token": refresh_token });
    let response = post_json(app.clone(), "/api/auth/refresh", body.clone()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let refreshed = body_json(response).await;
    assert!(refreshed["access_token"].is_string());
    assert_ne!(refreshed["refresh_token"], login_json["refresh_token"]);

    // The first refresh token was revoked by the rotation.
    let response = post_json(app, "/api/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_refresh_with_garbage_token(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "refresh_token": "not-a-real-token" });
    let response = post_json(app, "/api/auth/refresh", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Logout revokes every session; outstanding refresh tokens stop working.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_logout_revokes_sessions(pool: PgPool) {
    seed_user(&pool, None, ROLE_ADMIN, "leaver").await;
    let app = common::build_test_app(pool);

    let login_json = login(app.clone(), "leaver", TEST_PASSWORD).await;
    let access_token = login_json["access_token"].as_str().unwrap();
    let refresh_token = login_json["refresh_token"].as_str().unwrap();

    let response = post_json_auth(
        app.clone(),
        "/api/auth/logout",
        access_token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let body = serde_json::json!({ "refresh_token": refresh_token });
    let response = post_json(app, "/api/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
