//! Pagination cursor for list endpoints.

use serde::Deserialize;

/// Default number of artworks requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Pagination state installed from each list response.
///
/// `has_next` and `has_prev` are always derived from `page` and `total_pages`,
/// never copied from the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationState {
    /// State before the first page of a mode has arrived.
    #[must_use]
    pub const fn first(limit: u32) -> Self {
        Self {
            page: 1,
            limit,
            total: 0,
            total_pages: 0,
            has_next: false,
            has_prev: false,
        }
    }

    /// Builds a state and derives the navigation flags.
    #[must_use]
    pub const fn new(page: u32, limit: u32, total: u64, total_pages: u32) -> Self {
        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }

    /// State for a response that carried no pagination block: the page is final.
    #[must_use]
    pub fn single_page(page: u32, limit: u32, item_count: usize) -> Self {
        let total = u64::try_from(item_count).unwrap_or(u64::MAX);
        Self::new(page, limit, total, page)
    }
}

/// Pagination block as sent by the backend.
///
/// The backend names the page count `pages`; `totalPages` is accepted too.
/// Its own `hasNext`/`hasPrev` flags are ignored in favor of derived ones.
#[derive(Debug, Clone, Deserialize)]
pub struct WirePagination {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default, alias = "pages", alias = "totalPages")]
    pub total_pages: Option<u32>,
}

impl WirePagination {
    /// Resolves missing fields against the page that was requested.
    #[must_use]
    pub fn resolve(&self, requested_page: u32, requested_limit: u32, item_count: usize) -> PaginationState {
        let page = self.page.unwrap_or(requested_page).max(1);
        let limit = self.limit.unwrap_or(requested_limit);
        let total = self
            .total
            .unwrap_or_else(|| u64::try_from(item_count).unwrap_or(u64::MAX));
        let total_pages = self.total_pages.unwrap_or(page);
        PaginationState::new(page, limit, total, total_pages)
    }
}
