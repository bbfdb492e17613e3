//! OpenSearch-backed [`DocumentIndex`].

use async_trait::async_trait;
use opensearch::{
    http::{
        request::JsonBody,
        response::Response,
        transport::{SingleNodeConnectionPool, TransportBuilder},
    },
    indices::{IndicesCreateParts, IndicesExistsParts},
    params::Refresh,
    BulkParts, IndexParts, OpenSearch, SearchParts,
};
use serde_json::{json, Value};
use tracing::{debug, error, info, instrument};
use url::Url;

use crate::domain::{
    models::{SearchHit, SearchHits},
    ports::outbound::{DocumentIndex, DocumentIndexError, IndexDocument},
};

pub struct OpenSearchIndex {
    client: OpenSearch,
}

impl OpenSearchIndex {
    pub fn new(url: &str) -> Result<Self, DocumentIndexError> {
        let parsed = Url::parse(url).map_err(|e| DocumentIndexError::connection(e.to_string()))?;

        let transport = TransportBuilder::new(SingleNodeConnectionPool::new(parsed))
            .disable_proxy()
            .build()
            .map_err(|e| DocumentIndexError::connection(e.to_string()))?;

        info!(url = %url, "created OpenSearch client");

        Ok(Self {
            client: OpenSearch::new(transport),
        })
    }
}

/// Fails with the response body when the status is not 2xx.
async fn ensure_success(response: Response) -> Result<Response, DocumentIndexError> {
    let status = response.status_code();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    error!(status = %status, body = %body, "index request failed");
    Err(DocumentIndexError::response(status.as_u16(), body))
}

/// Reads `hits.total.value` and `hits.hits` out of a `_search` response.
///
/// A missing total is reported as 0 and hits without an `_id` are dropped.
pub fn parse_search_response(body: &Value) -> SearchHits {
    let hits = &body["hits"];

    let total = match &hits["total"] {
        Value::Object(total) => total.get("value").and_then(Value::as_u64).unwrap_or(0),
        // Pre-7.x clusters report a bare number.
        Value::Number(total) => total.as_u64().unwrap_or(0),
        _ => 0,
    };

    let hits = hits["hits"]
        .as_array()
        .map(|hits| {
            hits.iter()
                .filter_map(|hit| {
                    Some(SearchHit {
                        id: hit.get("_id")?.as_str()?.to_string(),
                        score: hit.get("_score").and_then(Value::as_f64),
                        source: hit.get("_source").cloned().unwrap_or(Value::Null),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    SearchHits { total, hits }
}

/// Counts failed items in a `_bulk` response whose `errors` flag is set.
fn bulk_failures(body: &Value) -> usize {
    if !body["errors"].as_bool().unwrap_or(false) {
        return 0;
    }

    body["items"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter(|item| item["index"].get("error").is_some())
                .count()
        })
        .unwrap_or(0)
}

#[async_trait]
impl DocumentIndex for OpenSearchIndex {
    async fn index_exists(&self, index: &str) -> Result<bool, DocumentIndexError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| DocumentIndexError::request(e.to_string()))?;

        match response.status_code().as_u16() {
            200 => Ok(true),
            404 => Ok(false),
            _ => ensure_success(response).await.map(|_| true),
        }
    }

    #[instrument(skip(self, mapping))]
    async fn create_index(&self, index: &str, mapping: &Value) -> Result<(), DocumentIndexError> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .body(mapping.clone())
            .send()
            .await
            .map_err(|e| DocumentIndexError::request(e.to_string()))?;

        ensure_success(response).await?;
        info!(index, "created index");
        Ok(())
    }

    async fn index_document(
        &self,
        index: &str,
        id: &str,
        document: &Value,
    ) -> Result<(), DocumentIndexError> {
        let response = self
            .client
            .index(IndexParts::IndexId(index, id))
            .refresh(Refresh::True)
            .body(document.clone())
            .send()
            .await
            .map_err(|e| DocumentIndexError::request(e.to_string()))?;

        ensure_success(response).await?;
        debug!(index, id, "indexed document");
        Ok(())
    }

    #[instrument(skip(self, documents), fields(count = documents.len()))]
    async fn bulk_index(
        &self,
        index: &str,
        documents: &[IndexDocument],
    ) -> Result<(), DocumentIndexError> {
        if documents.is_empty() {
            return Ok(());
        }

        let mut body: Vec<JsonBody<Value>> = Vec::with_capacity(documents.len() * 2);
        for document in documents {
            body.push(json!({ "index": { "_id": document.id } }).into());
            body.push(document.source.clone().into());
        }

        let response = self
            .client
            .bulk(BulkParts::Index(index))
            .refresh(Refresh::True)
            .body(body)
            .send()
            .await
            .map_err(|e| DocumentIndexError::request(e.to_string()))?;

        let response = ensure_success(response).await?;
        let status = response.status_code().as_u16();
        let body: Value = response
            .json()
            .await
            .map_err(|e| DocumentIndexError::request(e.to_string()))?;

        let failed = bulk_failures(&body);
        if failed > 0 {
            return Err(DocumentIndexError::response(
                status,
                format!("{failed} of {} documents failed to index", documents.len()),
            ));
        }

        debug!("bulk indexed documents");
        Ok(())
    }

    async fn search(&self, index: &str, body: &Value) -> Result<SearchHits, DocumentIndexError> {
        debug!(index, query = %body, "searching");

        let response = self
            .client
            .search(SearchParts::Index(&[index]))
            .body(body.clone())
            .send()
            .await
            .map_err(|e| DocumentIndexError::request(e.to_string()))?;

        let response = ensure_success(response).await?;
        let body: Value = response
            .json()
            .await
            .map_err(|e| DocumentIndexError::request(e.to_string()))?;

        Ok(parse_search_response(&body))
    }

    async fn ping(&self) -> Result<(), DocumentIndexError> {
        let response = self
            .client
            .ping()
            .send()
            .await
            .map_err(|e| DocumentIndexError::connection(e.to_string()))?;

        ensure_success(response).await.map(|_| ())
    }
}
