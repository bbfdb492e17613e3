use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::{app_state::AppState, routes};

pub fn create(app_state: AppState, app_url: &str) -> Router<()> {
    let api = Router::new()
        .nest("/business", routes::business::router())
        .nest("/staff", routes::staff::router())
        .nest("/elastic", routes::search::router());

    let base_app = Router::new()
        .route("/", get(|| async { "business-api" }))
        .nest("/api/v1", api)
        .layer(middleware::from_fn_with_state(
            app_state.clone(),
            routes::logging::log_request,
        ));

    let allow_origin = match HeaderValue::from_str(app_url) {
        Ok(origin) => AllowOrigin::exact(origin),
        Err(_) => {
            tracing::warn!(app_url, "app_url is not a valid origin, CORS disabled");
            AllowOrigin::list(Vec::<HeaderValue>::new())
        }
    };
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(allow_origin);

    // Finally, wrap the app with state, CORS and the tracing layer
    base_app
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
}
