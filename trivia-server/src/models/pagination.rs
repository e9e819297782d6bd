//! Pagination types for the question listing

use serde::{Deserialize, Serialize};

/// Questions returned per page
pub const QUESTIONS_PER_PAGE: u32 = 10;

/// Pagination parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Page number (1-indexed)
    pub page: u32,
    /// Items per page
    pub per_page: u32,
}

impl Pagination {
    /// Build pagination for a requested page number.
    ///
    /// Returns `None` for page numbers below 1; those address no page at all.
    pub fn for_page(page: i64) -> Option<Self> {
        let page = u32::try_from(page).ok().filter(|p| *p >= 1)?;
        Some(Self {
            page,
            per_page: QUESTIONS_PER_PAGE,
        })
    }

    /// Calculate SQL OFFSET value.
    pub fn offset(&self) -> u64 {
        (u64::from(self.page) - 1) * u64::from(self.per_page)
    }

    /// Get LIMIT value.
    pub fn limit(&self) -> u32 {
        self.per_page
    }

    /// Whether this is the first page (allowed to be empty).
    pub fn is_first(&self) -> bool {
        self.page == 1
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: QUESTIONS_PER_PAGE,
        }
    }
}

/// One page of items plus the unsliced total
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Items for current page
    pub items: Vec<T>,
    /// Total count across all pages
    pub total: i64,
    /// Current page number
    pub page: u32,
}

/// Query parameters for `GET /questions`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
}

impl PageParams {
    /// Requested page, defaulting to 1.
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1)
    }
}
