//! Shared query parameter types for API handlers.
//!
//! Common query structs that appear across multiple handler modules are
//! extracted here to avoid duplication.

use agrihub_core::pagination::{clamp_page, clamp_page_size};
use agrihub_core::types::DbId;
use serde::Deserialize;

/// Generic list parameters (`?page=&pageSize=&keyword=`).
///
/// Used by every listing endpoint. Values are clamped via
/// `clamp_page` / `clamp_page_size` before reaching the repository layer.
/// `farm_id` is only honored on back-office routes, where admins use it to
/// pick the farm they are operating on.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<i64>,
    #[serde(rename = "pageSize", alias = "limit")]
    pub page_size: Option<i64>,
    pub keyword: Option<String>,
    pub farm_id: Option<DbId>,
}

impl ListParams {
    /// The effective (clamped) page number.
    pub fn page(&self) -> i64 {
        clamp_page(self.page)
    }

    /// The effective (clamped) page size.
    pub fn page_size(&self) -> i64 {
        clamp_page_size(self.page_size)
    }

    /// The keyword filter, with blank strings treated as absent.
    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref().filter(|k| !k.trim().is_empty())
    }
}
