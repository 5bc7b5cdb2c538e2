//! SerpApiClient against a local axum server standing in for serpapi.com.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde_json::json;

use serpapi_client::{Device, SearchParams, SerpApiClient, SerpApiError};

type Seen = Arc<Mutex<Vec<HashMap<String, String>>>>;

async fn search(State(seen): State<Seen>, Query(query): Query<HashMap<String, String>>) -> Response {
    seen.lock().unwrap().push(query.clone());
    match query.get("q").map(String::as_str) {
        Some("bad key") => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Invalid API key. Your API key should be here: https://serpapi.com/manage-api-key"})),
        )
            .into_response(),
        Some("rate limited") => (StatusCode::TOO_MANY_REQUESTS, "slow down").into_response(),
        Some("no results") => {
            Json(json!({"error": "Google hasn't returned any results for this query."})).into_response()
        }
        Some("garbage") => "<html>not json</html>".into_response(),
        _ => Json(json!({
            "search_metadata": {"id": "65f0c1", "status": "Success"},
            "organic_results": [
                {"position": 1, "title": "First", "link": "https://first.co.il/"},
                {"position": 2, "title": "Second", "link": "https://www.example.com/shop", "snippet": "..."}
            ]
        }))
        .into_response(),
    }
}

async fn spawn_server() -> (String, Seen) {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new().route("/search", get(search)).with_state(seen.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/"), seen)
}

#[tokio::test]
async fn sends_params_and_api_key_and_decodes_results() {
    let (base_url, seen) = spawn_server().await;
    let client = SerpApiClient::new("test-key".to_string()).with_base_url(&base_url);

    let params = SearchParams::google("נעלי ריצה")
        .locale("he", "il")
        .device(Device::Mobile)
        .start(10);
    let resp = client.search(&params).await.unwrap();

    let links: Vec<&str> = resp.organic_results.iter().map(|r| r.link.as_str()).collect();
    assert_eq!(links, vec!["https://first.co.il/", "https://www.example.com/shop"]);
    assert_eq!(resp.search_metadata.unwrap().id, "65f0c1");

    let seen = seen.lock().unwrap();
    let query = &seen[0];
    assert_eq!(query["api_key"], "test-key");
    assert_eq!(query["engine"], "google");
    assert_eq!(query["q"], "נעלי ריצה");
    assert_eq!(query["hl"], "he");
    assert_eq!(query["gl"], "il");
    assert_eq!(query["device"], "mobile");
    assert_eq!(query["start"], "10");
}

#[tokio::test]
async fn unauthorized_body_error_becomes_api_error() {
    let (base_url, _) = spawn_server().await;
    let client = SerpApiClient::new("wrong".to_string()).with_base_url(&base_url);

    let err = client.search(&SearchParams::google("bad key")).await.unwrap_err();
    match err {
        SerpApiError::Api { status, message } => {
            assert_eq!(status, 401);
            assert!(message.starts_with("Invalid API key."));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_error_body_is_kept_verbatim() {
    let (base_url, _) = spawn_server().await;
    let client = SerpApiClient::new("k".to_string()).with_base_url(&base_url);

    let err = client.search(&SearchParams::google("rate limited")).await.unwrap_err();
    match err {
        SerpApiError::Api { status, message } => {
            assert_eq!(status, 429);
            assert_eq!(message, "slow down");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn error_field_with_ok_status_is_api_error() {
    let (base_url, _) = spawn_server().await;
    let client = SerpApiClient::new("k".to_string()).with_base_url(&base_url);

    let err = client.search(&SearchParams::google("no results")).await.unwrap_err();
    assert!(matches!(err, SerpApiError::Api { status: 200, .. }));
}

#[tokio::test]
async fn undecodable_body_is_parse_error() {
    let (base_url, _) = spawn_server().await;
    let client = SerpApiClient::new("k".to_string()).with_base_url(&base_url);

    let err = client.search(&SearchParams::google("garbage")).await.unwrap_err();
    assert!(matches!(err, SerpApiError::Parse(_)));
}

