use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
    #[error("Not found: {0}")]
    NotFound(String),
    /// A unique or foreign key constraint rejected the write.
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Query timed out after {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, Error)]
pub enum DocumentIndexError {
    #[error("connection error: {0}")]
    Connection(String),
    #[error("request error: {0}")]
    Request(String),
    #[error("index responded with {status}: {body}")]
    Response { status: u16, body: String },
}

impl DocumentIndexError {
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    pub fn request(msg: impl Into<String>) -> Self {
        Self::Request(msg.into())
    }

    pub fn response(status: u16, body: impl Into<String>) -> Self {
        Self::Response {
            status,
            body: body.into(),
        }
    }
}
