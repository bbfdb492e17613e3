use thiserror::Error;

use super::models::{BusinessId, StaffId};

/// Errors that can occur during business operations.
#[derive(Debug, Error)]
pub enum BusinessError {
    #[error("business not found: {0}")]
    NotFound(BusinessId),
    #[error("{0}")]
    InvalidInput(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl BusinessError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Errors that can occur during staff operations.
#[derive(Debug, Error)]
pub enum StaffError {
    #[error("staff not found: {0}")]
    NotFound(StaffId),
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    Conflict(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl StaffError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("{0}")]
    InvalidRequest(String),
    #[error("search index error: {0}")]
    Index(String),
    #[error("storage error: {0}")]
    Storage(String),
}
