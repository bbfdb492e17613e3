use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
    Router,
};
use tracing::{instrument, warn};

use super::{
    extract::{Json, Path, Query},
    ApiError,
};
use crate::{
    adapters::inbound::http::{BusinessListParams, BusinessPayload, Envelope},
    app_state::AppState,
    domain::{
        ingestion::CancellationGuard,
        models::{Business, BusinessId, PageMeta},
    },
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_business))
        .route("/create-v2", post(create_generated_businesses))
        .route("/get-one/:id", get(get_business))
        .route("/get-one-v2/:id", get(get_business_with_staffs))
        .route("/get-list", get(list_businesses))
        .route("/get-list-v2", get(list_businesses_with_staffs))
        .route("/update/:id", put(update_business))
        .route("/delete/:id", delete(delete_business))
}

type BusinessList = Json<Envelope<Vec<Business>, PageMeta>>;

#[instrument(name = "POST /business/create", skip(app_state))]
async fn create_business(
    State(app_state): State<AppState>,
    Json(payload): Json<BusinessPayload>,
) -> Result<(StatusCode, Json<Envelope<Business>>), ApiError> {
    let business = app_state
        .business_service
        .create_business(payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(Envelope::data(business))))
}

#[instrument(name = "POST /business/create-v2", skip(app_state))]
async fn create_generated_businesses(
    State(app_state): State<AppState>,
) -> Result<(StatusCode, Json<Envelope<Vec<Business>>>), ApiError> {
    // Dropping the handler future (client gone) drops the guard and stops the workers.
    let (_guard, cancel) = CancellationGuard::new();

    let report = app_state
        .business_service
        .create_generated_businesses(cancel)
        .await?;

    if !report.is_complete() {
        warn!(summary = %report.summary(), "Bulk creation finished with failures");
        return Err(ApiError::internal(report.summary()));
    }

    Ok((
        StatusCode::CREATED,
        Json(Envelope::data(report.into_businesses())),
    ))
}

#[instrument(name = "GET /business/get-one/:id", skip(app_state))]
async fn get_business(
    State(app_state): State<AppState>,
    Path(id): Path<BusinessId>,
) -> Result<Json<Envelope<Business>>, ApiError> {
    let business = app_state.business_service.get_business(id).await?;
    Ok(Json(Envelope::data(business)))
}

#[instrument(name = "GET /business/get-one-v2/:id", skip(app_state))]
async fn get_business_with_staffs(
    State(app_state): State<AppState>,
    Path(id): Path<BusinessId>,
) -> Result<Json<Envelope<Business>>, ApiError> {
    let business = app_state
        .business_service
        .get_business_with_staffs(id)
        .await?;
    Ok(Json(Envelope::data(business)))
}

#[instrument(name = "GET /business/get-list", skip(app_state))]
async fn list_businesses(
    State(app_state): State<AppState>,
    Query(params): Query<BusinessListParams>,
) -> Result<BusinessList, ApiError> {
    let page = app_state
        .business_service
        .list_businesses(params.into())
        .await?;
    Ok(Json(page.into()))
}

#[instrument(name = "GET /business/get-list-v2", skip(app_state))]
async fn list_businesses_with_staffs(
    State(app_state): State<AppState>,
    Query(params): Query<BusinessListParams>,
) -> Result<BusinessList, ApiError> {
    let page = app_state
        .business_service
        .list_businesses_with_staffs(params.into())
        .await?;
    Ok(Json(page.into()))
}

#[instrument(name = "PUT /business/update/:id", skip(app_state))]
async fn update_business(
    State(app_state): State<AppState>,
    Path(id): Path<BusinessId>,
    Json(payload): Json<BusinessPayload>,
) -> Result<Json<Envelope<Business>>, ApiError> {
    let business = app_state
        .business_service
        .update_business(id, payload.into())
        .await?;
    Ok(Json(Envelope::data(business)))
}

#[instrument(name = "DELETE /business/delete/:id", skip(app_state))]
async fn delete_business(
    State(app_state): State<AppState>,
    Path(id): Path<BusinessId>,
) -> Result<StatusCode, ApiError> {
    app_state.business_service.delete_business(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
