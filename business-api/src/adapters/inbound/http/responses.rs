//! HTTP response bodies.
//!
//! Every successful response is wrapped as `{"data": ..., "meta": ...}`; `meta` is
//! omitted when there is nothing to say about paging.

use serde::Serialize;

use crate::domain::models::{
    Business, BusinessSearchPage, Page, PageMeta, SearchHit, SearchHits, SearchRequest,
};

#[derive(Debug, Serialize)]
pub struct Envelope<T, M = ()> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<M>,
}

impl<T> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self { data, meta: None }
    }
}

impl<T, M> Envelope<T, M> {
    pub fn with_meta(data: T, meta: M) -> Self {
        Self {
            data,
            meta: Some(meta),
        }
    }
}

impl<T> From<Page<T>> for Envelope<Vec<T>, PageMeta> {
    fn from(page: Page<T>) -> Self {
        Self::with_meta(page.data, page.meta)
    }
}

/// Paging of a field-filtered search.
#[derive(Debug, Serialize)]
pub struct FieldSearchMeta {
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
}

impl From<BusinessSearchPage> for Envelope<Vec<Business>, FieldSearchMeta> {
    fn from(page: BusinessSearchPage) -> Self {
        Self::with_meta(
            page.data,
            FieldSearchMeta {
                page: page.page,
                page_size: page.size,
                total: page.total,
            },
        )
    }
}

/// Paging of a full-text search.
#[derive(Debug, Serialize)]
pub struct FullTextMeta {
    pub page: u32,
    pub size: u32,
    pub total: u64,
}

impl FullTextMeta {
    pub fn new(request: &SearchRequest, hits: &SearchHits) -> Self {
        Self {
            page: request.page,
            size: request.size,
            total: hits.total,
        }
    }
}

/// Full-text hits in the document store's own layout:
/// `{"hits": {"total": {"value": n}, "hits": [{"_id", "_score", "_source"}]}}`.
#[derive(Debug, Serialize)]
pub struct FullTextResult {
    hits: FullTextHits,
}

#[derive(Debug, Serialize)]
struct FullTextHits {
    total: HitTotal,
    hits: Vec<SearchHit>,
}

#[derive(Debug, Serialize)]
struct HitTotal {
    value: u64,
}

impl From<SearchHits> for FullTextResult {
    fn from(hits: SearchHits) -> Self {
        Self {
            hits: FullTextHits {
                total: HitTotal { value: hits.total },
                hits: hits.hits,
            },
        }
    }
}
