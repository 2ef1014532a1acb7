//! Pagination clamping shared by all list repositories.

/// Default page size when the client omits `pageSize`.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Upper bound on `pageSize` to keep list queries cheap.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Clamp a requested page number to a 1-based value.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

/// Clamp a requested page size into `[1, MAX_PAGE_SIZE]`.
pub fn clamp_page_size(page_size: Option<i64>) -> i64 {
    page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE)
}

/// SQL OFFSET for a clamped page/page-size pair.
pub fn offset(page: i64, page_size: i64) -> i64 {
    (page - 1) * page_size
}

/// Total page count for a result set.
pub fn page_count(total: i64, page_size: i64) -> i64 {
    if total == 0 {
        0
    } else {
        (total + page_size - 1) / page_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_defaults_to_one() {
        assert_eq!(clamp_page(None), 1);
        assert_eq!(clamp_page(Some(0)), 1);
        assert_eq!(clamp_page(Some(-4)), 1);
        assert_eq!(clamp_page(Some(3)), 3);
    }

    #[test]
    fn test_page_size_clamped() {
        assert_eq!(clamp_page_size(None), DEFAULT_PAGE_SIZE);
        assert_eq!(clamp_page_size(Some(0)), 1);
        assert_eq!(clamp_page_size(Some(1000)), MAX_PAGE_SIZE);
    }

    #[test]
    fn test_offset() {
        assert_eq!(offset(1, 20), 0);
        assert_eq!(offset(3, 10), 20);
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
    }
}
