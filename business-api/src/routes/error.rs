use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;

use crate::domain::{BusinessError, SearchError, StaffError};

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl From<BusinessError> for ApiError {
    fn from(err: BusinessError) -> Self {
        match err {
            BusinessError::NotFound(_) => Self::not_found(err.to_string()),
            BusinessError::InvalidInput(message) => Self::bad_request(message),
            BusinessError::Storage(message) => {
                tracing::error!("Business storage error: {}", message);
                Self::internal("internal server error")
            }
        }
    }
}

impl From<StaffError> for ApiError {
    fn from(err: StaffError) -> Self {
        match err {
            StaffError::NotFound(_) => Self::not_found(err.to_string()),
            StaffError::InvalidInput(message) => Self::bad_request(message),
            StaffError::Conflict(message) => {
                tracing::debug!("Staff write rejected: {}", message);
                Self::conflict("username, email or business reference conflicts with stored data")
            }
            StaffError::Storage(message) => {
                tracing::error!("Staff storage error: {}", message);
                Self::internal("internal server error")
            }
        }
    }
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::InvalidRequest(message) => Self::bad_request(message),
            SearchError::Index(message) => {
                tracing::error!("Search index error: {}", message);
                Self::internal("search index unavailable")
            }
            SearchError::Storage(message) => {
                tracing::error!("Search storage error: {}", message);
                Self::internal("internal server error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::domain::models::BusinessId;

    #[test]
    fn domain_errors_map_to_statuses() {
        let missing = ApiError::from(BusinessError::NotFound(BusinessId::new(Uuid::nil())));
        assert_eq!(missing.status, StatusCode::NOT_FOUND);

        let invalid = ApiError::from(StaffError::invalid("email is not valid"));
        assert_eq!(invalid.status, StatusCode::BAD_REQUEST);

        let conflict = ApiError::from(StaffError::Conflict("duplicate key".to_string()));
        assert_eq!(conflict.status, StatusCode::CONFLICT);

        let index = ApiError::from(SearchError::Index("connection refused".to_string()));
        assert_eq!(index.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn internal_detail_is_not_exposed() {
        let err = ApiError::from(BusinessError::Storage("password=hunter2".to_string()));
        assert!(!err.to_string().contains("hunter2"));
    }
}
