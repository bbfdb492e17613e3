//! In-memory document index that evaluates the subset of the query DSL the service emits.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use crate::domain::{
    models::{SearchHit, SearchHits},
    ports::outbound::{DocumentIndex, DocumentIndexError, IndexDocument},
};

#[derive(Default)]
struct MockIndex {
    mapping: Value,
    documents: Vec<(String, Value)>,
}

impl MockIndex {
    fn upsert(&mut self, id: &str, document: &Value) {
        match self.documents.iter_mut().find(|(doc_id, _)| doc_id == id) {
            Some(existing) => existing.1 = document.clone(),
            None => self.documents.push((id.to_string(), document.clone())),
        }
    }
}

#[derive(Clone, Default)]
pub struct MockDocumentIndex {
    indices: Arc<RwLock<HashMap<String, MockIndex>>>,
    queries: Arc<RwLock<Vec<Value>>>,
    create_calls: Arc<RwLock<usize>>,
    omit_total: bool,
}

#[allow(dead_code)]
impl MockDocumentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an index with `(id, source)` documents.
    pub fn with_documents(self, index: &str, documents: Vec<(String, Value)>) -> Self {
        {
            let mut indices = self.indices.write().unwrap();
            let target = indices.entry(index.to_string()).or_default();
            for (id, doc) in documents {
                target.upsert(&id, &doc);
            }
        }
        self
    }

    /// Responses leave out `hits.total`, like some cluster configurations do.
    pub fn without_totals(mut self) -> Self {
        self.omit_total = true;
        self
    }

    pub fn documents(&self, index: &str) -> Vec<(String, Value)> {
        self.indices
            .read()
            .unwrap()
            .get(index)
            .map(|i| i.documents.clone())
            .unwrap_or_default()
    }

    pub fn mapping(&self, index: &str) -> Option<Value> {
        self.indices
            .read()
            .unwrap()
            .get(index)
            .map(|i| i.mapping.clone())
    }

    pub fn create_calls(&self) -> usize {
        *self.create_calls.read().unwrap()
    }

    /// Every query body received, oldest first.
    pub fn queries(&self) -> Vec<Value> {
        self.queries.read().unwrap().clone()
    }
}

#[async_trait]
impl DocumentIndex for MockDocumentIndex {
    async fn index_exists(&self, index: &str) -> Result<bool, DocumentIndexError> {
        Ok(self.indices.read().unwrap().contains_key(index))
    }

    async fn create_index(&self, index: &str, mapping: &Value) -> Result<(), DocumentIndexError> {
        let mut indices = self.indices.write().unwrap();
        if indices.contains_key(index) {
            return Err(DocumentIndexError::response(
                400,
                "resource_already_exists_exception",
            ));
        }
        indices.insert(
            index.to_string(),
            MockIndex {
                mapping: mapping.clone(),
                documents: Vec::new(),
            },
        );
        *self.create_calls.write().unwrap() += 1;
        Ok(())
    }

    async fn index_document(
        &self,
        index: &str,
        id: &str,
        document: &Value,
    ) -> Result<(), DocumentIndexError> {
        self.indices
            .write()
            .unwrap()
            .entry(index.to_string())
            .or_default()
            .upsert(id, document);
        Ok(())
    }

    async fn bulk_index(
        &self,
        index: &str,
        documents: &[IndexDocument],
    ) -> Result<(), DocumentIndexError> {
        let mut indices = self.indices.write().unwrap();
        let target = indices.entry(index.to_string()).or_default();
        for doc in documents {
            target.upsert(&doc.id, &doc.source);
        }
        Ok(())
    }

    async fn search(&self, index: &str, body: &Value) -> Result<SearchHits, DocumentIndexError> {
        self.queries.write().unwrap().push(body.clone());

        let indices = self.indices.read().unwrap();
        let Some(target) = indices.get(index) else {
            return Err(DocumentIndexError::response(404, "index_not_found_exception"));
        };

        let query = body.get("query").unwrap_or(&Value::Null);
        let mut matched: Vec<&(String, Value)> = target
            .documents
            .iter()
            .filter(|(_, doc)| matches(doc, query))
            .collect();

        if let Some((field, descending)) = sort_key(body) {
            matched.sort_by(|(_, a), (_, b)| {
                let ordering = compare(a.get(&field), b.get(&field));
                if descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }

        let total = matched.len() as u64;
        let from = body.get("from").and_then(Value::as_u64).unwrap_or(0) as usize;
        let size = body.get("size").and_then(Value::as_u64).unwrap_or(10) as usize;
        let hits = matched
            .into_iter()
            .skip(from)
            .take(size)
            .map(|(id, doc)| SearchHit {
                id: id.clone(),
                score: Some(1.0),
                source: project(doc, body.get("_source")),
            })
            .collect();

        Ok(SearchHits {
            total: if self.omit_total { 0 } else { total },
            hits,
        })
    }

    async fn ping(&self) -> Result<(), DocumentIndexError> {
        Ok(())
    }
}

fn matches(doc: &Value, query: &Value) -> bool {
    let Some(clause) = query.as_object() else {
        return true;
    };

    if let Some(bool_query) = clause.get("bool") {
        return bool_query
            .get("must")
            .and_then(Value::as_array)
            .map_or(true, |must| must.iter().all(|c| matches(doc, c)));
    }
    if clause.contains_key("match_all") {
        return true;
    }
    if let Some(Value::Object(field)) = clause.get("match") {
        return field.iter().all(|(name, value)| {
            let query = value
                .get("query")
                .unwrap_or(value)
                .as_str()
                .unwrap_or_default();
            text_matches(doc.get(name), query)
        });
    }
    if let Some(multi) = clause.get("multi_match") {
        let query = multi.get("query").and_then(Value::as_str).unwrap_or_default();
        return multi
            .get("fields")
            .and_then(Value::as_array)
            .map_or(false, |fields| {
                fields
                    .iter()
                    .filter_map(Value::as_str)
                    .any(|f| text_matches(doc.get(f), query))
            });
    }
    if let Some(Value::Object(field)) = clause.get("range") {
        return field
            .iter()
            .all(|(name, bounds)| in_range(doc.get(name), bounds));
    }

    false
}

fn tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Analyzed match: any query token equal to any document token.
fn text_matches(value: Option<&Value>, query: &str) -> bool {
    let Some(text) = value.and_then(Value::as_str) else {
        return false;
    };
    let doc_tokens = tokens(text);
    tokens(query).iter().any(|t| doc_tokens.contains(t))
}

fn in_range(value: Option<&Value>, bounds: &Value) -> bool {
    let parse = |v: &Value| v.as_str().and_then(|s| OffsetDateTime::parse(s, &Rfc3339).ok());
    let Some(at) = value.and_then(parse) else {
        return false;
    };

    let lower_ok = bounds.get("gte").and_then(parse).map_or(true, |gte| at >= gte);
    let upper_ok = bounds.get("lte").and_then(parse).map_or(true, |lte| at <= lte);
    lower_ok && upper_ok
}

fn sort_key(body: &Value) -> Option<(String, bool)> {
    let first = body.get("sort")?.as_array()?.first()?.as_object()?;
    let (field, spec) = first.iter().next()?;
    let descending = spec.get("order").and_then(Value::as_str) == Some("desc");
    Some((field.clone(), descending))
}

fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(a), Some(b)) => a
            .as_str()
            .unwrap_or_default()
            .cmp(b.as_str().unwrap_or_default()),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn project(doc: &Value, source: Option<&Value>) -> Value {
    let Some(fields) = source.and_then(Value::as_array) else {
        return doc.clone();
    };
    let mut projected = Map::new();
    for name in fields.iter().filter_map(Value::as_str) {
        if let Some(value) = doc.get(name) {
            projected.insert(name.to_string(), value.clone());
        }
    }
    Value::Object(projected)
}
