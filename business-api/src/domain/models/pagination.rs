use serde::Serialize;
use strum::{Display, EnumString};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// A normalized, 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    /// Missing or non-positive values fall back to page 1 / size 10; sizes are capped.
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Self {
        let page = match page {
            Some(p) if p >= 1 => p.min(u32::MAX as i64) as u32,
            _ => 1,
        };
        let page_size = match page_size {
            Some(s) if s >= 1 => s.min(MAX_PAGE_SIZE as i64) as u32,
            _ => DEFAULT_PAGE_SIZE,
        };

        Self { page, page_size }
    }

    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.page_size as i64
    }

    pub fn limit(&self) -> i64 {
        self.page_size as i64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PageMeta {
    pub page: u32,
    pub page_size: u32,
    pub total: i64,
    pub total_pages: i64,
}

impl PageMeta {
    pub fn new(request: PageRequest, total: i64) -> Self {
        let size = request.page_size.max(1) as i64;
        Self {
            page: request.page,
            page_size: request.page_size,
            total,
            total_pages: (total + size - 1) / size,
        }
    }
}

/// One page of results plus its metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, request: PageRequest, total: i64) -> Self {
        Self {
            data,
            meta: PageMeta::new(request, total),
        }
    }
}

#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, EnumString)]
pub enum SortDirection {
    #[strum(ascii_case_insensitive, serialize = "ASC")]
    Asc,
    #[strum(ascii_case_insensitive, serialize = "DESC")]
    Desc,
}

/// An ORDER BY clause restricted to a whitelist of column names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListSort {
    pub column: &'static str,
    pub direction: SortDirection,
}

impl ListSort {
    pub const fn newest_first() -> Self {
        Self {
            column: "created_at",
            direction: SortDirection::Desc,
        }
    }

    /// Parses `"column direction"` or `"column:direction"`.
    ///
    /// Returns `None` when the column is not in `allowed` or the direction is unknown,
    /// so the raw value never reaches SQL.
    pub fn parse(raw: &str, allowed: &[&'static str]) -> Option<Self> {
        let raw = raw.trim();
        let (column, direction) = match raw.split_once(|c: char| c == ':' || c.is_whitespace()) {
            Some((column, direction)) => (column.trim(), direction.trim().parse().ok()?),
            None => (raw, SortDirection::Asc),
        };

        let column = allowed.iter().find(|allowed| **allowed == column)?;
        Some(Self {
            column,
            direction,
        })
    }

    pub fn parse_or_default(raw: Option<&str>, allowed: &[&'static str]) -> Self {
        raw.and_then(|raw| Self::parse(raw, allowed))
            .unwrap_or_else(Self::newest_first)
    }
}

impl Default for ListSort {
    fn default() -> Self {
        Self::newest_first()
    }
}
