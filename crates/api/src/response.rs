//! Shared response envelope types for API handlers.
//!
//! The two route families keep their historical list shapes: back-office
//! lists return `{data, totalItem, page, pageSize}` while the self-service
//! web lists return `{data, pagination: {page, limit, total, pages}}`.
//! Single-entity responses use the common `{ "data": ... }` envelope.

use agrihub_core::pagination::page_count;
use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// Wraps any serializable payload in the project's standard response format.
///
/// # Example
///
/// ```ignore
/// Ok(Json(DataResponse { data: farm }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Back-office list envelope: `{data, totalItem, page, pageSize}`.
#[derive(Debug, Serialize)]
pub struct PagedResponse<T: Serialize> {
    pub data: Vec<T>,
    #[serde(rename = "totalItem")]
    pub total_item: i64,
    pub page: i64,
    #[serde(rename = "pageSize")]
    pub page_size: i64,
}

impl<T: Serialize> PagedResponse<T> {
    pub fn new(data: Vec<T>, total_item: i64, page: i64, page_size: i64) -> Self {
        Self {
            data,
            total_item,
            page,
            page_size,
        }
    }
}

/// Self-service list envelope: `{data, pagination: {...}}`.
#[derive(Debug, Serialize)]
pub struct WebPagedResponse<T: Serialize> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

/// The `pagination` object of [`WebPagedResponse`].
#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl<T: Serialize> WebPagedResponse<T> {
    pub fn new(data: Vec<T>, total: i64, page: i64, limit: i64) -> Self {
        Self {
            data,
            pagination: Pagination {
                page,
                limit,
                total,
                pages: page_count(total, limit),
            },
        }
    }
}
