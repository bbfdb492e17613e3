use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use tracing::instrument;

use super::{extract::Json, ApiError};
use crate::{
    adapters::inbound::http::{
        Envelope, FieldSearchMeta, FullTextMeta, FullTextResult, SearchPayload,
    },
    app_state::AppState,
    domain::models::Business,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/push-to-elastic", post(push_to_index))
        .route("/search-by-field", post(search_by_field))
        // Clients send a body with GET here, so both verbs are accepted.
        .route("/fulltext-search", get(full_text_search).post(full_text_search))
}

#[instrument(name = "POST /elastic/push-to-elastic", skip(app_state))]
async fn push_to_index(
    State(app_state): State<AppState>,
) -> Result<Json<Envelope<Option<Business>>>, ApiError> {
    let first = app_state.search_service.push_to_index().await?;
    Ok(Json(Envelope::data(first)))
}

#[instrument(name = "POST /elastic/search-by-field", skip(app_state))]
async fn search_by_field(
    State(app_state): State<AppState>,
    Json(payload): Json<SearchPayload>,
) -> Result<Json<Envelope<Vec<Business>, FieldSearchMeta>>, ApiError> {
    let request = payload.into_request(&app_state.default_index);
    let page = app_state.search_service.search_by_field(&request).await?;
    Ok(Json(page.into()))
}

#[instrument(name = "/elastic/fulltext-search", skip(app_state))]
async fn full_text_search(
    State(app_state): State<AppState>,
    Json(payload): Json<SearchPayload>,
) -> Result<Json<Envelope<FullTextResult, FullTextMeta>>, ApiError> {
    let request = payload.into_request(&app_state.default_index);
    let hits = app_state.search_service.full_text_search(&request).await?;
    let meta = FullTextMeta::new(&request, &hits);
    Ok(Json(Envelope::with_meta(hits.into(), meta)))
}
