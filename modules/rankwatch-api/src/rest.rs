use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use tracing::warn;

use rankwatch_common::RankWatchError;

use crate::AppState;

// --- Request bodies ---

#[derive(Deserialize)]
pub struct DomainRequest {
    #[serde(default)]
    domain: Option<String>,
}

#[derive(Deserialize)]
pub struct KeywordRequest {
    #[serde(default)]
    domain: Option<String>,
    #[serde(default)]
    keyword: Option<String>,
}

// --- Helpers ---

fn success() -> Response {
    Json(serde_json::json!({ "success": true })).into_response()
}

fn error_response(err: RankWatchError) -> Response {
    let status = match &err {
        RankWatchError::Validation(_) => StatusCode::BAD_REQUEST,
        RankWatchError::NotFound(_) => StatusCode::NOT_FOUND,
        RankWatchError::Upstream(_) | RankWatchError::Storage(_) | RankWatchError::Config(_) => {
            warn!(error = %err, "Request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(serde_json::json!({ "error": err.to_string() }))).into_response()
}

/// Malformed bodies get the same `{"error"}` shape as validation failures.
fn bad_body(rejection: JsonRejection) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": format!("Invalid request body: {}", rejection.body_text()) })),
    )
        .into_response()
}

// --- Handlers ---

pub async fn add_domain(
    State(state): State<Arc<AppState>>,
    body: Result<Json<DomainRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_body(rejection),
    };
    let domain = body.domain.unwrap_or_default();
    match state.tracker.add_domain(&domain).await {
        Ok(_) => success(),
        Err(e) => error_response(e),
    }
}

pub async fn add_keyword(
    State(state): State<Arc<AppState>>,
    body: Result<Json<KeywordRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_body(rejection),
    };
    let domain = body.domain.unwrap_or_default();
    let keyword = body.keyword.unwrap_or_default();
    match state.tracker.add_keyword(&domain, &keyword).await {
        Ok(()) => success(),
        Err(e) => error_response(e),
    }
}

pub async fn check_rank(
    State(state): State<Arc<AppState>>,
    body: Result<Json<DomainRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_body(rejection),
    };
    let domain = body.domain.unwrap_or_default();
    match state.tracker.check_rank(&domain).await {
        Ok(entries) => Json(entries).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn list_domains(State(state): State<Arc<AppState>>) -> Response {
    match state.tracker.list_domains().await {
        Ok(domains) => Json(domains).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn list_keywords(
    State(state): State<Arc<AppState>>,
    Path(domain): Path<String>,
) -> Response {
    match state.tracker.list_keywords(&domain).await {
        Ok(keywords) => Json(keywords).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn keyword_history(
    State(state): State<Arc<AppState>>,
    Path((domain, keyword)): Path<(String, String)>,
) -> Response {
    match state.tracker.keyword_history(&domain, &keyword).await {
        Ok(history) => Json(history).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn delete_domain(
    State(state): State<Arc<AppState>>,
    Path(domain): Path<String>,
) -> Response {
    match state.tracker.delete_domain(&domain).await {
        Ok(()) => success(),
        Err(e) => error_response(e),
    }
}

pub async fn delete_keyword(
    State(state): State<Arc<AppState>>,
    Path((domain, keyword)): Path<(String, String)>,
) -> Response {
    match state.tracker.delete_keyword(&domain, &keyword).await {
        Ok(()) => success(),
        Err(e) => error_response(e),
    }
}
