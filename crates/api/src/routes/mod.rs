//! Route tree assembly.
//!
//! Three families under `/api`:
//!
//! ```text
//! /api/auth/...    login / refresh / logout
//! /api/admin/...   back-office (manager of the farm, or admin)
//! /api/web/...     farmer / expert self-service
//! ```
//!
//! `/health` and the `/uploads` static tree are mounted at the root.

pub mod admin;
pub mod auth;
pub mod health;
pub mod web;

use axum::Router;
use tower_http::services::ServeDir;

use crate::state::AppState;

/// Build the application router (no middleware layers; `main` adds those).
pub fn router(state: AppState) -> Router {
    let uploads = ServeDir::new(&state.config.upload_dir);

    Router::new()
        .merge(health::router())
        .nest("/api", api_routes())
        .nest_service("/uploads", uploads)
        .with_state(state)
}

/// Build the `/api` route tree.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .nest("/web", web::router())
}
