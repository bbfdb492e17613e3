use async_trait::async_trait;

use crate::domain::{
    models::{Business, BusinessSearchPage, SearchHits, SearchRequest},
    SearchError,
};

#[async_trait]
pub trait SearchService: Send + Sync + 'static {
    /// Copies every stored business (with staff) into the search index.
    ///
    /// Creates the index with its mapping first if it is missing. Returns the first
    /// business indexed, or `None` when there was nothing to push.
    async fn push_to_index(&self) -> Result<Option<Business>, SearchError>;

    async fn search_by_field(
        &self,
        request: &SearchRequest,
    ) -> Result<BusinessSearchPage, SearchError>;

    async fn full_text_search(&self, request: &SearchRequest) -> Result<SearchHits, SearchError>;
}
