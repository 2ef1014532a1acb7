//! Shared harness for HTTP-level integration tests.
//!
//! Builds the full application router with the production middleware stack,
//! but with the external weather/advisor clients replaced by in-memory stubs
//! so tests never touch the network.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use agrihub_api::auth::jwt::{generate_access_token, JwtConfig};
use agrihub_api::auth::password::hash_password;
use agrihub_api::clients::{AdvisorClient, AdvisorReply, DailyForecast, WeatherClient, WeatherReport};
use agrihub_api::config::ServerConfig;
use agrihub_api::routes;
use agrihub_api::state::AppState;
use agrihub_core::error::CoreError;
use agrihub_core::types::DbId;
use agrihub_db::models::equipment::{CreateEquipment, CreateEquipmentCategory, Equipment};
use agrihub_db::models::farm::CreateFarm;
use agrihub_db::models::garden::CreateGarden;
use agrihub_db::models::task::{CreateTask, Task};
use agrihub_db::models::user::User;
use agrihub_db::repositories::{
    EquipmentCategoryRepo, EquipmentRepo, FarmRepo, GardenRepo, TaskRepo, UserRepo,
};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::timeout::TimeoutLayer;

/// The fixed password used for all test accounts.
pub const TEST_PASSWORD: &str = "test_password_123!";

/// Build a test `ServerConfig` with a known JWT secret and safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        upload_dir: std::env::temp_dir()
            .join("agrihub-test-uploads")
            .to_string_lossy()
            .into_owned(),
        weather_api_url: "http://stub.invalid".to_string(),
        advisor_api_url: "http://stub.invalid".to_string(),
        advisor_api_key: String::new(),
        advisor_model: "stub".to_string(),
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Weather stub returning a single canned forecast day.
pub struct StubWeather;

#[async_trait]
impl WeatherClient for StubWeather {
    async fn forecast(&self, latitude: f64, longitude: f64) -> Result<WeatherReport, CoreError> {
        Ok(WeatherReport {
            latitude,
            longitude,
            daily: vec![DailyForecast {
                date: "2025-06-01".to_string(),
                temperature_max_c: 24.0,
                temperature_min_c: 12.0,
                precipitation_mm: 0.4,
            }],
        })
    }
}

/// Advisor stub echoing a fixed reply.
pub struct StubAdvisor;

#[async_trait]
impl AdvisorClient for StubAdvisor {
    async fn advise(&self, _prompt: &str) -> Result<AdvisorReply, CoreError> {
        Ok(AdvisorReply {
            content: "Rotate your crops.".to_string(),
        })
    }
}

/// Build the full application router against the given database pool.
///
/// Mirrors the router construction in `main.rs` (panic recovery, timeout)
/// so tests exercise the same stack production uses. CORS and request-id
/// layers are omitted as they do not affect response semantics.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_bus(pool, Arc::new(agrihub_events::EventBus::default()))
}

/// Like [`build_test_app`], but with a caller-supplied event bus so tests
/// can subscribe to the events handlers publish.
pub fn build_test_app_with_bus(
    pool: PgPool,
    event_bus: Arc<agrihub_events::EventBus>,
) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config),
        event_bus,
        weather: Arc::new(StubWeather),
        advisor: Arc::new(StubAdvisor),
    };

    routes::router(state)
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
}

// ---------------------------------------------------------------------------
// Database fixtures
// ---------------------------------------------------------------------------

pub async fn seed_farm(pool: &PgPool) -> DbId {
    FarmRepo::create(
        pool,
        &CreateFarm {
            name: "Green Acres".into(),
            address: "1 Field Lane".into(),
            description: "Test farm".into(),
            image: None,
        },
    )
    .await
    .expect("farm fixture")
    .id
}

/// Create a user with [`TEST_PASSWORD`] hashed for real, so login works.
pub async fn seed_user(
    pool: &PgPool,
    farm_id: Option<DbId>,
    role: &str,
    username: &str,
) -> User {
    let hashed = hash_password(TEST_PASSWORD).expect("hashing should succeed");
    UserRepo::create(
        pool,
        farm_id,
        username,
        &format!("{username}@test.com"),
        &hashed,
        "Test User",
        None,
        role,
    )
    .await
    .expect("user fixture")
}

pub async fn seed_category(pool: &PgPool) -> DbId {
    EquipmentCategoryRepo::create(
        pool,
        &CreateEquipmentCategory {
            name: "Tools".into(),
            description: String::new(),
        },
    )
    .await
    .expect("category fixture")
    .id
}

pub async fn seed_equipment(
    pool: &PgPool,
    farm_id: DbId,
    category_id: DbId,
    quantity: i32,
) -> Equipment {
    EquipmentRepo::create(
        pool,
        &CreateEquipment {
            farm_id,
            category_id,
            name: "Shovel".into(),
            image: None,
            quantity,
            description: String::new(),
        },
    )
    .await
    .expect("equipment fixture")
}

pub async fn seed_garden(pool: &PgPool, farm_id: DbId) -> DbId {
    GardenRepo::create(
        pool,
        &CreateGarden {
            farm_id,
            name: "North Plot".into(),
            area_m2: Some(120.0),
            description: String::new(),
            image: None,
        },
    )
    .await
    .expect("garden fixture")
    .id
}

pub async fn seed_task(pool: &PgPool, farm_id: DbId, garden_id: DbId) -> Task {
    TaskRepo::create(
        pool,
        farm_id,
        &CreateTask {
            garden_id,
            name: "Water the beds".into(),
            description: String::new(),
            image: None,
            task_type: "collect".into(),
            priority: None,
            start_date: None,
            end_date: None,
        },
        "medium",
    )
    .await
    .expect("task fixture")
}

/// Mint a valid access token for the given user, matching [`test_config`].
pub fn token_for(user: &User) -> String {
    let config = test_config();
    generate_access_token(user.id, &user.role, user.farm_id, &config.jwt)
        .expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    let request = Request::builder()
        .method("PUT")
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn delete_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect and parse a JSON response body.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body should be valid JSON")
}

/// Collect a raw response body.
pub async fn body_bytes(response: Response) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}
