use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
    Router,
};
use tracing::instrument;

use super::{
    extract::{Json, Path, Query},
    ApiError,
};
use crate::{
    adapters::inbound::http::{
        Envelope, StaffListParams, StaffPageParams, StaffPayload, StaffUpdatePayload,
    },
    app_state::AppState,
    domain::models::{PageMeta, Staff, StaffId},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_staff))
        .route("/get-one/:id", get(get_staff))
        .route("/get-list", get(list_staff))
        .route("/get-list-paging", get(search_staff))
        .route("/update/:id", put(update_staff))
        .route("/delete/:id", delete(delete_staff))
}

type StaffList = Json<Envelope<Vec<Staff>, PageMeta>>;

// The payload carries a plaintext password, so it stays out of the span.
#[instrument(name = "POST /staff/create", skip(app_state, payload))]
async fn create_staff(
    State(app_state): State<AppState>,
    Json(payload): Json<StaffPayload>,
) -> Result<(StatusCode, Json<Envelope<Staff>>), ApiError> {
    let staff = app_state.staff_service.create_staff(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(Envelope::data(staff))))
}

#[instrument(name = "GET /staff/get-one/:id", skip(app_state))]
async fn get_staff(
    State(app_state): State<AppState>,
    Path(id): Path<StaffId>,
) -> Result<Json<Envelope<Staff>>, ApiError> {
    let staff = app_state.staff_service.get_staff(id).await?;
    Ok(Json(Envelope::data(staff)))
}

#[instrument(name = "GET /staff/get-list", skip(app_state))]
async fn list_staff(
    State(app_state): State<AppState>,
    Query(params): Query<StaffListParams>,
) -> Result<StaffList, ApiError> {
    let page = app_state.staff_service.list_staff(params.into()).await?;
    Ok(Json(page.into()))
}

#[instrument(name = "GET /staff/get-list-paging", skip(app_state))]
async fn search_staff(
    State(app_state): State<AppState>,
    Query(params): Query<StaffPageParams>,
) -> Result<StaffList, ApiError> {
    let page = app_state.staff_service.search_staff(params.into()).await?;
    Ok(Json(page.into()))
}

#[instrument(name = "PUT /staff/update/:id", skip(app_state))]
async fn update_staff(
    State(app_state): State<AppState>,
    Path(id): Path<StaffId>,
    Json(payload): Json<StaffUpdatePayload>,
) -> Result<Json<Envelope<Staff>>, ApiError> {
    let staff = app_state
        .staff_service
        .update_staff(id, payload.into())
        .await?;
    Ok(Json(Envelope::data(staff)))
}

#[instrument(name = "DELETE /staff/delete/:id", skip(app_state))]
async fn delete_staff(
    State(app_state): State<AppState>,
    Path(id): Path<StaffId>,
) -> Result<StatusCode, ApiError> {
    app_state.staff_service.delete_staff(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
