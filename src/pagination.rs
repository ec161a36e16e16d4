//! This module defines the common functionality for paging list responses.

use serde::Serialize;

/// The page number to default to when not specified in a request.
pub const DEFAULT_PAGE: u64 = 1;
/// The number of rows per page when not specified in a request.
pub const DEFAULT_PAGE_SIZE: u64 = 20;
/// The largest page size a client may request.
pub const MAX_PAGE_SIZE: u64 = 100;

/// The resolved page parameters for a list query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    /// The 1-based page number.
    pub page: u64,
    /// The number of rows per page.
    pub page_size: u64,
}

impl PageParams {
    /// Resolve the raw query parameters, applying defaults and clamping the
    /// page size to [MAX_PAGE_SIZE].
    pub fn resolve(page: Option<u64>, page_size: Option<u64>) -> Self {
        Self {
            page: page.unwrap_or(DEFAULT_PAGE).max(1),
            page_size: page_size
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// The number of rows to skip for this page.
    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.page_size
    }
}

/// A page of results together with the total row count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paginated<T> {
    /// The total number of rows matching the query, across all pages.
    pub count: u64,
    /// The page number of this response.
    pub page: u64,
    /// The page size used for this response.
    pub page_size: u64,
    /// The rows for this page.
    pub results: Vec<T>,
}
