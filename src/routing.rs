//! Application router configuration.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;

use crate::{
    AppState, endpoints,
    handlers::{get_period_cost_deep_endpoint, get_period_cost_endpoint, get_pie_endpoint},
    logging::logging_middleware,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::PERIOD_COST, get(get_period_cost_endpoint))
        .route(
            endpoints::PERIOD_COST_DEEP,
            get(get_period_cost_deep_endpoint),
        )
        .route(endpoints::PIE, get(get_pie_endpoint))
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "not found" })),
    )
        .into_response()
}
