pub mod rest;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};

use rankwatch_tracker::Tracker;

pub struct AppState {
    pub tracker: Tracker,
}

/// All routes, with CORS open to any origin and per-request tracing spans.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/", get(|| async { "ok" }))
        // Domains and keywords
        .route("/add-domain", post(rest::add_domain))
        .route("/add-keyword", post(rest::add_keyword))
        .route("/check-rank", post(rest::check_rank))
        .route("/domains", get(rest::list_domains))
        .route("/domains/{domain}", get(rest::list_keywords))
        .route("/domains/{domain}/{keyword}", get(rest::keyword_history))
        .route("/delete-domain/{domain}", delete(rest::delete_domain))
        .route("/delete-keyword/{domain}/{keyword}", delete(rest::delete_keyword))
        .with_state(state)
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
}
