use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::domain::{
    models::{
        Business, BusinessListQuery, BusinessSearchPage, PageRequest, SearchHits, SearchRequest,
    },
    ports::{
        inbound::SearchService,
        outbound::{BusinessRepository, DocumentIndex, DocumentIndexError, IndexDocument},
    },
    search::{
        build_field_query, build_full_text_query, business_from_hit, business_index_mapping,
        BusinessDocument,
    },
    SearchError,
};

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Index written by the push operation and used when a request names none.
    pub index_name: String,
    pub push_batch_size: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            index_name: "business".to_string(),
            push_batch_size: 500,
        }
    }
}

pub struct SearchServiceImpl<B, I> {
    businesses: Arc<B>,
    index: Arc<I>,
    config: SearchConfig,
}

impl<B, I> SearchServiceImpl<B, I> {
    pub fn new(businesses: Arc<B>, index: Arc<I>, config: SearchConfig) -> Self {
        Self {
            businesses,
            index,
            config,
        }
    }
}

impl From<DocumentIndexError> for SearchError {
    fn from(err: DocumentIndexError) -> Self {
        SearchError::Index(err.to_string())
    }
}

fn validate(request: &SearchRequest) -> Result<(), SearchError> {
    if request.index.trim().is_empty() {
        return Err(SearchError::InvalidRequest("index must not be empty".to_string()));
    }
    if request.page < 1 || request.size < 1 {
        return Err(SearchError::InvalidRequest(
            "page and size must be at least 1".to_string(),
        ));
    }
    Ok(())
}

impl<B: BusinessRepository, I: DocumentIndex> SearchServiceImpl<B, I> {
    async fn ensure_index(&self) -> Result<(), SearchError> {
        let index = &self.config.index_name;
        if self.index.index_exists(index).await? {
            return Ok(());
        }

        self.index
            .create_index(index, &business_index_mapping())
            .await?;
        info!(index = %index, "Created search index");
        Ok(())
    }

    async fn index_page(&self, businesses: &[Business]) -> Result<(), SearchError> {
        let index = &self.config.index_name;
        let documents: Vec<IndexDocument> = businesses
            .iter()
            .map(|business| IndexDocument {
                id: business.id.to_string(),
                source: BusinessDocument::from(business).to_value(),
            })
            .collect();

        match documents.as_slice() {
            [] => Ok(()),
            [single] => Ok(self
                .index
                .index_document(index, &single.id, &single.source)
                .await?),
            _ => Ok(self.index.bulk_index(index, &documents).await?),
        }
    }
}

#[async_trait]
impl<B: BusinessRepository, I: DocumentIndex> SearchService for SearchServiceImpl<B, I> {
    #[instrument(skip(self), fields(index = %self.config.index_name))]
    async fn push_to_index(&self) -> Result<Option<Business>, SearchError> {
        self.ensure_index().await?;

        let page_size = self.config.push_batch_size.max(1);
        let mut page = 1;
        let mut pushed = 0usize;
        let mut first = None;

        loop {
            let query = BusinessListQuery::everything(PageRequest { page, page_size });
            let result = self
                .businesses
                .list_with_staffs(&query, None)
                .await
                .map_err(|e| SearchError::Storage(e.to_string()))?;

            if result.data.is_empty() {
                break;
            }

            self.index_page(&result.data).await?;
            pushed += result.data.len();
            debug!(page, pushed, "Indexed page of businesses");

            if first.is_none() {
                first = result.data.into_iter().next();
            }
            if i64::from(page) >= result.meta.total_pages {
                break;
            }
            page += 1;
        }

        info!(pushed, "Pushed businesses to search index");
        Ok(first)
    }

    #[instrument(skip(self, request), fields(index = %request.index, page = request.page))]
    async fn search_by_field(
        &self,
        request: &SearchRequest,
    ) -> Result<BusinessSearchPage, SearchError> {
        validate(request)?;

        let body = build_field_query(request);
        debug!(query = %body, "Field search");
        let hits = self.index.search(&request.index, &body).await?;

        let data = hits
            .hits
            .iter()
            .filter_map(|hit| {
                let business = business_from_hit(hit);
                if business.is_none() {
                    warn!(id = %hit.id, "Skipping search hit that does not map to a business");
                }
                business
            })
            .collect();

        Ok(BusinessSearchPage {
            data,
            total: hits.total,
            page: request.page,
            size: request.size,
        })
    }

    #[instrument(skip(self, request), fields(index = %request.index, page = request.page))]
    async fn full_text_search(&self, request: &SearchRequest) -> Result<SearchHits, SearchError> {
        validate(request)?;

        let body = build_full_text_query(request);
        debug!(query = %body, "Full-text search");
        Ok(self.index.search(&request.index, &body).await?)
    }
}
