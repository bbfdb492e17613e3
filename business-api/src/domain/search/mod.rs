//! Business search over an OpenSearch/Elasticsearch-compatible index.
//!
//! - [`query`] builds query DSL bodies from
//!   [`SearchRequest`](crate::domain::models::SearchRequest)s
//! - [`document`] defines the indexed document shape and the index mapping

pub mod document;
pub mod query;

pub use document::*;
pub use query::*;
