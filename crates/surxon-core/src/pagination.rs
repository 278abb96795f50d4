//! # Pagination
//!
//! Page-number pagination for product listings: 20 items per page by
//! default, at most 100.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;

/// Default number of items per page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Upper bound for a requested page size.
pub const MAX_PAGE_SIZE: u32 = 100;

/// A resolved page request (1-based page number).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    /// Resolves optional query parameters.
    ///
    /// ## Rules
    /// - Missing page → 1; page 0 is rejected
    /// - Missing page size → `default_size`
    /// - Page size is clamped to `1..=max_size`
    ///
    /// ```rust
    /// use surxon_core::pagination::PageRequest;
    ///
    /// let req = PageRequest::resolve(Some(2), Some(500), 20, 100).unwrap();
    /// assert_eq!((req.page, req.page_size), (2, 100));
    /// ```
    pub fn resolve(
        page: Option<u32>,
        page_size: Option<u32>,
        default_size: u32,
        max_size: u32,
    ) -> Result<Self, ValidationError> {
        let page = page.unwrap_or(1);
        if page == 0 {
            return Err(ValidationError::InvalidFormat {
                field: "page".to_string(),
                reason: "must be 1 or greater".to_string(),
            });
        }

        let max_size = max_size.max(1);
        let page_size = page_size.unwrap_or(default_size).clamp(1, max_size);

        Ok(PageRequest { page, page_size })
    }

    /// Rows to skip.
    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.page_size as i64
    }

    pub fn limit(&self) -> i64 {
        self.page_size as i64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of results plus navigation facts.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Page<T: TS> {
    /// Total matching items across all pages.
    pub count: u64,
    pub page: u32,
    pub page_size: u32,
    pub has_next: bool,
    pub has_previous: bool,
    pub items: Vec<T>,
}

impl<T: TS> Page<T> {
    pub fn new(items: Vec<T>, count: u64, request: PageRequest) -> Self {
        let seen = request.offset().max(0) as u64 + items.len() as u64;
        Page {
            count,
            page: request.page,
            page_size: request.page_size,
            has_next: seen < count,
            has_previous: request.page > 1,
            items,
        }
    }

    pub fn map<U: TS, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            count: self.count,
            page: self.page,
            page_size: self.page_size,
            has_next: self.has_next,
            has_previous: self.has_previous,
            items: self.items.into_iter().map(f).collect(),
        }
    }
}
