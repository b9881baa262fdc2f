//! HTTP API tests
//!
//! Drive the router with `oneshot` requests against a session whose first
//! capture cycle has already landed.

mod helpers;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use ftt_common::events::EventBus;
use ftt_lm::services::dedup_key;
use ftt_lm::session::{LabelSession, SessionComponents, SessionConfig};
use ftt_lm::{build_router, AppState};
use helpers::{label, FixedRecognizer, MemorySink, StaticCamera};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

/// Session with one pending soy sauce label; the next capture is an hour away
async fn setup() -> (Router, Arc<LabelSession>, String) {
    let soy = label("soy sauce", "Prepped", &["01/01/24 10:00", "03/01/24 10:00"]);
    let key = dedup_key(&soy).into_inner();

    let session = LabelSession::start(
        SessionComponents {
            camera: Arc::new(StaticCamera),
            recognizer: Arc::new(FixedRecognizer::new(vec![soy])),
            sink: Arc::new(MemorySink::default()),
            event_bus: EventBus::new(64),
        },
        SessionConfig {
            capture_interval: Duration::from_secs(3600),
            ..Default::default()
        },
        CancellationToken::new(),
    )
    .await
    .unwrap();

    for _ in 0..200 {
        if !session.snapshot().await.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let router = build_router(AppState::new(Arc::clone(&session)));
    (router, session, key)
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_key(uri: &str, key: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(json!({ "key": key }).to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let (router, session, _key) = setup().await;

    let (status, body) = send(&router, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["module"], "ftt-lm");
    assert!(body["capture_cycles"].as_u64().unwrap() >= 1);

    session.shutdown().await;
}

#[tokio::test]
async fn test_list_labels_renders_rows() {
    let (router, session, key) = setup().await;

    let (status, body) = send(&router, get("/labels")).await;

    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["key"], key.as_str());
    assert_eq!(rows[0]["state"], "Expired");
    assert_eq!(rows[0]["cue"], "Red");
    assert_eq!(rows[0]["layout"]["layout"], "Standard");
    assert_eq!(rows[0]["layout"]["use_by"], "03/01/24 10:00");

    session.shutdown().await;
}

#[tokio::test]
async fn test_commit_then_commit_again_is_not_found() {
    let (router, session, key) = setup().await;

    let (status, body) = send(&router, post_key("/labels/commit", &key)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["action"], "committed");
    assert!(session.store().is_committed(&dedup_key_of(&key)).await);

    let (status, body) = send(&router, post_key("/labels/commit", &key)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (_, body) = send(&router, get("/labels")).await;
    assert!(body.as_array().unwrap().is_empty());

    session.shutdown().await;
}

#[tokio::test]
async fn test_discard_removes_without_committing() {
    let (router, session, key) = setup().await;

    let (status, body) = send(&router, post_key("/labels/discard", &key)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["action"], "discarded");
    assert!(session.snapshot().await.is_empty());
    assert!(!session.store().is_committed(&dedup_key_of(&key)).await);

    session.shutdown().await;
}

#[tokio::test]
async fn test_empty_key_is_bad_request() {
    let (router, session, _key) = setup().await;

    let (status, body) = send(&router, post_key("/labels/discard", "  ")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    session.shutdown().await;
}

#[tokio::test]
async fn test_unknown_key_is_not_found() {
    let (router, session, _key) = setup().await;

    let (status, _) = send(&router, post_key("/labels/discard", "nothing|N/A|N/A")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(session.snapshot().await.len(), 1);

    session.shutdown().await;
}

fn dedup_key_of(raw: &str) -> ftt_lm::models::DedupKey {
    ftt_lm::models::DedupKey::new(raw)
}
