//! SerpApiSearcher and Tracker against a local stand-in for serpapi.com.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};

use rankwatch_common::{Device, RankWatchError};
use rankwatch_tracker::{lookup_rank, Document, MemoryStore, SerpApiSearcher, Tracker};
use serpapi_client::SerpApiClient;

type Seen = Arc<Mutex<Vec<HashMap<String, String>>>>;

async fn search(State(seen): State<Seen>, Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    seen.lock().unwrap().push(query.clone());
    let q = query.get("q").cloned().unwrap_or_default();
    let start = query.get("start").cloned().unwrap_or_default();
    match (q.as_str(), start.as_str()) {
        ("rare phrase", _) => Json(json!({"error": "Google hasn't returned any results for this query."})),
        ("shoes", "10") => Json(json!({"organic_results": [
            {"position": 1, "title": "x", "link": "https://x.co.il/"},
            {"position": 2, "title": "e", "link": "https://www.example.com/shoes"}
        ]})),
        _ => Json(json!({"organic_results": [
            {"position": 1, "title": "a", "link": "https://a.co.il/"}
        ]})),
    }
}

async fn searcher() -> (SerpApiSearcher, Seen) {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new().route("/search", get(search)).with_state(seen.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = SerpApiClient::new("tracker-key".to_string()).with_base_url(&format!("http://{addr}"));
    (SerpApiSearcher::from_client(client), seen)
}

#[tokio::test]
async fn lookup_queries_hebrew_israel_per_device_and_page() {
    let (searcher, seen) = searcher().await;

    let rank = lookup_rank(&searcher, "example.com", "shoes", Device::Mobile).await.unwrap();
    assert_eq!(rank, Some(12));

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    for query in seen.iter() {
        assert_eq!(query["engine"], "google");
        assert_eq!(query["q"], "shoes");
        assert_eq!(query["hl"], "he");
        assert_eq!(query["gl"], "il");
        assert_eq!(query["device"], "mobile");
        assert_eq!(query["api_key"], "tracker-key");
    }
    assert_eq!(seen[0]["start"], "0");
    assert_eq!(seen[1]["start"], "10");
}

#[tokio::test]
async fn desktop_lookup_sends_desktop_device() {
    let (searcher, seen) = searcher().await;

    let rank = lookup_rank(&searcher, "missing.org", "boots", Device::Desktop).await.unwrap();
    assert_eq!(rank, None);
    assert!(seen.lock().unwrap().iter().all(|q| q["device"] == "desktop"));
}

#[tokio::test]
async fn search_api_error_fails_check_and_saves_nothing() {
    let (searcher, _) = searcher().await;

    let mut document = Document::new();
    document.upsert_keyword("example.com", "shoes");
    document.upsert_keyword("example.com", "rare phrase");
    let store = Arc::new(MemoryStore::with_document(document));
    let tracker = Tracker::new(store, Arc::new(searcher));

    let err = tracker.check_rank("example.com").await.unwrap_err();
    match err {
        RankWatchError::Upstream(message) => assert!(message.contains("hasn't returned any results")),
        other => panic!("expected Upstream error, got {other:?}"),
    }
    assert!(tracker.keyword_history("example.com", "shoes").await.unwrap().is_empty());
    assert!(tracker.keyword_history("example.com", "rare phrase").await.unwrap().is_empty());
}
