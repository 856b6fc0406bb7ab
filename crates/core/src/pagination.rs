//! Page-number pagination for list endpoints.
//!
//! A list request carries an optional page size (`limit`) and an optional
//! 1-based page index (`offset`). [`PaginationPolicy::resolve`] turns those
//! plus the collection's total count into a [`PageWindow`]; the store then
//! fetches exactly `window.limit` rows starting at `window.skip()`.

use std::str::FromStr;

use serde::Serialize;

use crate::error::CoreError;
use crate::validation::FieldErrors;

/// Page size used when the request does not specify one.
pub const DEFAULT_LIMIT: i64 = 12;

/// Upper bound for a requested page size; larger values are clamped.
pub const MAX_LIMIT: i64 = 100;

/// What to do with a page index past the last page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOverflow {
    /// Reject with [`CoreError::InvalidPage`].
    NotFound,
    /// Serve the last page instead.
    Clamp,
}

impl FromStr for PageOverflow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "not_found" => Ok(PageOverflow::NotFound),
            "clamp" => Ok(PageOverflow::Clamp),
            other => Err(format!(
                "unknown page overflow policy '{other}' (expected 'not_found' or 'clamp')"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationPolicy {
    pub default_limit: i64,
    pub max_limit: i64,
    pub overflow: PageOverflow,
}

impl Default for PaginationPolicy {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: MAX_LIMIT,
            overflow: PageOverflow::NotFound,
        }
    }
}

/// The slice of a collection a list request resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Total number of items in the collection.
    pub count: i64,
    /// Effective page size.
    pub limit: i64,
    /// 1-based index of the page actually served.
    pub page: i64,
    pub page_count: i64,
}

impl PageWindow {
    /// Number of rows preceding this page.
    pub fn skip(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

/// `ceil(count / limit)`; zero for an empty collection.
pub fn page_count(count: i64, limit: i64) -> i64 {
    if count <= 0 || limit <= 0 {
        return 0;
    }
    (count + limit - 1) / limit
}

impl PaginationPolicy {
    /// Build a policy, keeping `1 <= default_limit <= max_limit`.
    pub fn new(default_limit: i64, max_limit: i64, overflow: PageOverflow) -> Self {
        let max_limit = max_limit.max(1);
        Self {
            default_limit: default_limit.clamp(1, max_limit),
            max_limit,
            overflow,
        }
    }

    /// Resolve request parameters against a collection of `count` items.
    ///
    /// - `limit < 1` or `page < 1` are validation errors on `limit` / `offset`.
    /// - `limit` above `max_limit` is clamped.
    /// - Page 1 is always valid, even for an empty collection.
    /// - A page past the last one is handled per [`PageOverflow`].
    pub fn resolve(
        &self,
        count: i64,
        limit: Option<i64>,
        page: Option<i64>,
    ) -> Result<PageWindow, CoreError> {
        let mut errors = FieldErrors::new();

        let limit = match limit {
            None => self.default_limit,
            Some(l) if l < 1 => {
                errors.add("limit", "Ensure this value is greater than or equal to 1.");
                0
            }
            Some(l) => l.min(self.max_limit),
        };

        let page = match page {
            None => 1,
            Some(p) if p < 1 => {
                errors.add("offset", "Ensure this value is greater than or equal to 1.");
                0
            }
            Some(p) => p,
        };

        errors.into_result()?;

        let page_count = page_count(count, limit);
        let last_page = page_count.max(1);

        let page = if page > last_page {
            match self.overflow {
                PageOverflow::NotFound => return Err(CoreError::InvalidPage { page, page_count }),
                PageOverflow::Clamp => last_page,
            }
        } else {
            page
        };

        Ok(PageWindow {
            count,
            limit,
            page,
            page_count,
        })
    }
}

/// List response envelope: `{count, limit, offset, page_count, data}`.
///
/// `offset` is the 1-based page index that was served.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub count: i64,
    pub limit: i64,
    pub offset: i64,
    pub page_count: i64,
    pub data: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(window: PageWindow, data: Vec<T>) -> Self {
        Self {
            count: window.count,
            limit: window.limit,
            offset: window.page,
            page_count: window.page_count,
            data,
        }
    }

    /// Convert every item, keeping the metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            limit: self.limit,
            offset: self.offset,
            page_count: self.page_count,
            data: self.data.into_iter().map(f).collect(),
        }
    }
}
