//! AgriHub API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes,
//! auth, external clients) so integration tests and the binary entrypoint
//! can both access them.

pub mod auth;
pub mod clients;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod notifications;
pub mod query;
pub mod report;
pub mod response;
pub mod routes;
pub mod state;
pub mod uploads;
