//! Pagination contract shared by every list/search endpoint.
//!
//! A search request carries an optional 1-based `page` and an optional `limit`.
//! [`PageRequest::resolve`] turns those into a validated [`PageWindow`]; the
//! storage layer answers with the total record count and the rows of that
//! window, which are wrapped in a [`Page`] envelope.
//!
//! Out-of-range values are rejected, never clamped: a client asking for
//! `limit = 500` gets a validation error rather than silently fewer rows.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Page served when the request omits `page`.
pub const DEFAULT_PAGE: i64 = 1;

/// Page size served when the request omits `limit`.
pub const DEFAULT_PAGE_LIMIT: i64 = 100;

/// Largest accepted page size.
pub const MAX_PAGE_LIMIT: i64 = 100;

// ---------------------------------------------------------------------------
// Request side
// ---------------------------------------------------------------------------

/// Raw pagination fields as they arrive in a search body or query string.
///
/// Kept signed so that negative input reaches [`resolve`](Self::resolve) and
/// is reported as a validation error instead of a deserialization failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

impl PageRequest {
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }

    /// Apply defaults and validate bounds.
    pub fn resolve(&self) -> Result<PageWindow, CoreError> {
        let page = self.page.unwrap_or(DEFAULT_PAGE);
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_LIMIT);

        if page < 1 {
            return Err(CoreError::Validation(format!(
                "page must be at least 1, got {page}"
            )));
        }
        if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
            return Err(CoreError::Validation(format!(
                "limit must be between 1 and {MAX_PAGE_LIMIT}, got {limit}"
            )));
        }

        let page = u32::try_from(page)
            .map_err(|_| CoreError::Validation(format!("page {page} is out of range")))?;

        Ok(PageWindow {
            page,
            // Bounded by MAX_PAGE_LIMIT above.
            limit: limit as u32,
        })
    }
}

/// A validated slice of a result set: 1-based page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u32,
    pub limit: u32,
}

impl PageWindow {
    /// Number of rows to skip before this window starts.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

impl Default for PageWindow {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE as u32,
            limit: DEFAULT_PAGE_LIMIT as u32,
        }
    }
}

// ---------------------------------------------------------------------------
// Response side
// ---------------------------------------------------------------------------

/// Paging metadata returned with every list response.
///
/// Invariant: `pages == ceil(records / limit)` and `current >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Current page, 1-based.
    pub current: u32,
    /// Page size the request asked for.
    pub limit: u32,
    /// Total number of records matching the request.
    pub records: u64,
    /// Total number of pages.
    pub pages: u64,
}

impl Pagination {
    pub fn new(window: PageWindow, records: u64) -> Self {
        Self {
            current: window.page,
            limit: window.limit,
            records,
            pages: records.div_ceil(u64::from(window.limit)),
        }
    }
}

/// The `{ pagination, data }` envelope. `data.len()` never exceeds `limit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub pagination: Pagination,
    pub data: Vec<T>,
}

impl<T> Page<T> {
    /// Wrap one window of rows together with the total record count.
    ///
    /// Rows beyond `limit` are dropped so the envelope invariant holds even
    /// if a backend over-fetches.
    pub fn new(window: PageWindow, records: u64, mut data: Vec<T>) -> Self {
        data.truncate(window.limit as usize);
        Self {
            pagination: Pagination::new(window, records),
            data,
        }
    }

    /// Cut the requested window out of a fully materialized, ordered result.
    pub fn from_all(window: PageWindow, all: Vec<T>) -> Self {
        let records = all.len() as u64;
        let data = all
            .into_iter()
            .skip(usize::try_from(window.offset()).unwrap_or(usize::MAX))
            .take(window.limit as usize)
            .collect();
        Self::new(window, records, data)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
