use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use super::Business;

pub const DEFAULT_SEARCH_PAGE_SIZE: u32 = 10;

/// Optional per-field criteria for business searches.
///
/// Blank strings are treated the same as absent ones.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchFilter {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    #[serde(rename = "type", alias = "businessType")]
    pub business_type: Option<String>,
    pub status: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub created_after: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub created_before: Option<OffsetDateTime>,
}

/// How the full-text clause spreads over the supplied filter values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldCombinator {
    /// One multi-field clause over every populated field, using the last populated value.
    #[default]
    AnyField,
    /// One clause per populated field, each using its own value.
    AllFields,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub index: String,
    pub page: u32,
    pub size: u32,
    pub sort: Option<String>,
    pub source: Vec<String>,
    pub filters: SearchFilter,
    pub combinator: FieldCombinator,
}

impl SearchRequest {
    pub fn new(index: impl Into<String>, page: Option<i64>, size: Option<i64>) -> Self {
        let page = match page {
            Some(p) if p >= 1 => p.min(u32::MAX as i64) as u32,
            _ => 1,
        };
        let size = match size {
            Some(s) if s >= 1 => s.min(u32::MAX as i64) as u32,
            _ => DEFAULT_SEARCH_PAGE_SIZE,
        };

        Self {
            index: index.into(),
            page,
            size,
            sort: None,
            source: Vec::new(),
            filters: SearchFilter::default(),
            combinator: FieldCombinator::default(),
        }
    }

    pub fn with_filters(mut self, filters: SearchFilter) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn with_source(mut self, source: Vec<String>) -> Self {
        self.source = source;
        self
    }

    pub fn with_combinator(mut self, combinator: FieldCombinator) -> Self {
        self.combinator = combinator;
        self
    }

    /// Offset of the first hit: `(page - 1) * size`.
    pub fn from(&self) -> u64 {
        (self.page.max(1) as u64 - 1) * self.size as u64
    }
}

/// Raw hits as returned by the document index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchHits {
    pub total: u64,
    pub hits: Vec<SearchHit>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_score")]
    pub score: Option<f64>,
    #[serde(rename = "_source")]
    pub source: Value,
}

/// Field-filtered search results mapped back into businesses.
#[derive(Debug, Clone)]
pub struct BusinessSearchPage {
    pub data: Vec<Business>,
    pub total: u64,
    pub page: u32,
    pub size: u32,
}
