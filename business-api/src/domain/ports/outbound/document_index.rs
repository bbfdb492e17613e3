use async_trait::async_trait;
use serde_json::Value;

use super::DocumentIndexError;
use crate::domain::models::SearchHits;

/// A document to write in a bulk request.
#[derive(Debug, Clone)]
pub struct IndexDocument {
    pub id: String,
    pub source: Value,
}

/// OpenSearch/Elasticsearch-compatible document store.
#[async_trait]
pub trait DocumentIndex: Send + Sync + 'static {
    async fn index_exists(&self, index: &str) -> Result<bool, DocumentIndexError>;

    async fn create_index(&self, index: &str, mapping: &Value) -> Result<(), DocumentIndexError>;

    async fn index_document(
        &self,
        index: &str,
        id: &str,
        document: &Value,
    ) -> Result<(), DocumentIndexError>;

    async fn bulk_index(
        &self,
        index: &str,
        documents: &[IndexDocument],
    ) -> Result<(), DocumentIndexError>;

    /// Runs a query DSL body and returns its hits. A missing total is reported as 0.
    async fn search(&self, index: &str, body: &Value) -> Result<SearchHits, DocumentIndexError>;

    async fn ping(&self) -> Result<(), DocumentIndexError>;
}
