use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};

use super::ApiError;
use crate::{app_state::AppState, config::Environment};

/// Bodies above this size are rejected before they reach a handler.
const MAX_LOGGED_BODY: usize = 2 * 1024 * 1024;

/// Logs method, URI and (for writes) the request body at debug level.
///
/// Headers are only logged outside production.
pub async fn log_request(
    State(app_state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (parts, body) = request.into_parts();

    if !matches!(app_state.environment, Environment::Production) {
        tracing::debug!(headers = ?parts.headers, "request headers");
    }

    let request = if matches!(parts.method, Method::POST | Method::PUT | Method::PATCH) {
        let bytes = to_bytes(body, MAX_LOGGED_BODY)
            .await
            .map_err(|e| ApiError::bad_request(format!("failed to read request body: {e}")))?;

        // Staff bodies carry plaintext passwords.
        if parts.uri.path().contains("/staff/") {
            tracing::debug!(method = %parts.method, uri = %parts.uri, "request");
        } else {
            tracing::debug!(
                method = %parts.method,
                uri = %parts.uri,
                body = %String::from_utf8_lossy(&bytes),
                "request"
            );
        }

        Request::from_parts(parts, Body::from(bytes))
    } else {
        tracing::debug!(method = %parts.method, uri = %parts.uri, "request");
        Request::from_parts(parts, body)
    };

    let response = next.run(request).await;
    tracing::debug!(status = %response.status(), "response");
    Ok(response)
}
