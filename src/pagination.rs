//! Offset Pagination
//!
//! Shared `{page, limit}` parameters and the `{items, total_count}` result
//! shape used by every list endpoint.

use serde::Serialize;

/// Default page size when the caller omits `limit`
pub const DEFAULT_LIMIT: u32 = 10;

/// Hard cap on page size
pub const MAX_LIMIT: u32 = 100;

/// One-based page / page-size pair
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    page: u32,
    limit: u32,
}

impl Pagination {
    /// Build from optional query parameters, clamping to sane bounds.
    ///
    /// Pages are one-based; `page: 0` is treated as the first page.
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        let page = page.unwrap_or(1).max(1);
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        Self { page, limit }
    }

    /// SQL OFFSET for this page
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.limit)
    }

    /// SQL LIMIT for this page
    pub fn limit(&self) -> i64 {
        i64::from(self.limit)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of results plus the unpaginated total
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: i64,
}
