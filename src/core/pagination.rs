//! Page/limit handling for list endpoints.

use crate::errors::{Error, Result};
use serde::Serialize;

/// A validated page request. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Builds a request from raw query-string values.
    ///
    /// Absent values fall back to page 1 and `default_limit`. Non-numeric,
    /// zero or negative values are rejected; a limit above `max_limit` is clamped.
    pub fn parse(
        page: Option<&str>,
        limit: Option<&str>,
        default_limit: u64,
        max_limit: u64,
    ) -> Result<Self> {
        let page = parse_positive("page", page)?.unwrap_or(1);
        let limit = parse_positive("limit", limit)?
            .unwrap_or(default_limit)
            .min(max_limit);
        Ok(Self { page, limit })
    }

    /// Number of rows to skip before this page.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

fn parse_positive(name: &str, raw: Option<&str>) -> Result<Option<u64>> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    match raw.parse::<u64>() {
        Ok(value) if value > 0 => Ok(Some(value)),
        _ => Err(Error::validation(format!(
            "{name} must be a positive integer"
        ))),
    }
}

/// Pagination block returned alongside a list page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub pages: u64,
}

impl Pagination {
    pub fn new(request: PageRequest, total: u64) -> Self {
        Self {
            page: request.page,
            limit: request.limit,
            total,
            pages: total.div_ceil(request.limit),
        }
    }
}

/// One page of results plus its pagination block.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}
