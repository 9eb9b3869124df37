//! Router construction: routes, CORS, request body ceiling.

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{analyze, health, history, logs, pipelines, train};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.effective_max_body_bytes());
    let cors = cors_layer(state.config.frontend_url.as_deref());

    Router::new()
        .route("/analyze", post(analyze::analyze))
        .route("/history", get(history::history))
        .route("/train", post(train::train))
        .route("/pipelines/:name", get(pipelines::pipeline_diff))
        .route("/pipeline-logs", get(logs::list_logs))
        .route("/pipeline-logs/:filename", get(logs::fetch_log))
        .route("/pipeline-logs/:filename/process", post(logs::process_log))
        .route("/health", get(health::health))
        .layer(body_limit)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Allow only the configured frontend origin; permissive when unset.
fn cors_layer(frontend_url: Option<&str>) -> CorsLayer {
    match frontend_url.and_then(|url| url.parse::<HeaderValue>().ok()) {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any),
        None => CorsLayer::permissive(),
    }
}
