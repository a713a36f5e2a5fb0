//! Tests for document content/summary routes, the AI answer route,
//! the index page, and health.


use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use lectern_gateway::{create_router, AppState};
use test_helpers::*;

async fn call_raw(state: AppState, uri: &str) -> (StatusCode, Vec<u8>) {
    let app = create_router(state);
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes().to_vec();
    (status, bytes)
}

async fn call(state: AppState, uri: &str) -> (StatusCode, serde_json::Value) {
    let (status, bytes) = call_raw(state, uri).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

// ── Document content ────────────────────────────────────────────────────

#[tokio::test]
async fn test_content_returns_file_verbatim() {
    let (state, _dir) = make_default_state();

    let (status, json) = call(state, "/api/document/content/Animals/cat.txt").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["content"], "cats purr");
}

#[tokio::test]
async fn test_content_unsafe_path_is_400() {
    let (state, _dir) = make_default_state();

    let (status, json) = call(state, "/api/document/content/..%2F..%2Fetc%2Fpasswd").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("Invalid document path"));
}

#[tokio::test]
async fn test_content_missing_document_is_404() {
    let (state, _dir) = make_default_state();

    let (status, json) = call(state, "/api/document/content/Animals/ghost.txt").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("not found"));
}

// ── Document summary ────────────────────────────────────────────────────

#[tokio::test]
async fn test_summary_returns_generated_text() {
    let (state, _dir) = make_default_state();

    let (status, json) = call(state, "/api/document/summary/Animals/cat.txt").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["summary"], "- mock summary");
}

#[tokio::test]
async fn test_summary_degrades_to_error_text_on_api_failure() {
    let (state, _dir) = make_test_state(
        MockEngine::returning(Vec::new()),
        MockGenerative { fail_transport: true },
    );

    let (status, json) = call(state, "/api/document/summary/Animals/cat.txt").await;

    // Still a 200: a broken summarizer must not block document reads
    assert_eq!(status, StatusCode::OK);
    assert!(json["summary"].as_str().unwrap().contains("Could not generate summary"));
}

#[tokio::test]
async fn test_summary_missing_document_is_404() {
    let (state, _dir) = make_default_state();

    let (status, _json) = call(state, "/api/document/summary/Animals/ghost.txt").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_summary_unsafe_path_is_400() {
    let (state, _dir) = make_default_state();

    let (status, _json) = call(state, "/api/document/summary/..%2Fsecrets.txt").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ── AI answer ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_ai_answer_returns_text_and_sources() {
    let (state, _dir) = make_default_state();

    let (status, json) = call(state, "/api/ai-answer?query=what%20is%20a%20truss").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["text"], "answer to: what is a truss");
    assert_eq!(json["sources"][0]["uri"], "https://example.com/ref");
    assert_eq!(json["sources"][0]["title"], "Reference");
}

#[tokio::test]
async fn test_ai_answer_empty_query_prompts_without_calling_api() {
    // A failing provider proves the remote endpoint was never consulted
    let (state, _dir) = make_test_state(
        MockEngine::returning(Vec::new()),
        MockGenerative { fail_transport: true },
    );

    let (status, json) = call(state, "/api/ai-answer?query=").await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["text"].as_str().unwrap().contains("Please enter a question"));
    assert!(json["sources"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_ai_answer_transport_failure_is_500() {
    let (state, _dir) = make_test_state(
        MockEngine::returning(Vec::new()),
        MockGenerative { fail_transport: true },
    );

    let (status, json) = call(state, "/api/ai-answer?query=anything").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["error"].as_str().unwrap().contains("AI service"));
}

// ── Index page and health ───────────────────────────────────────────────

#[tokio::test]
async fn test_index_page_served() {
    let (state, _dir) = make_default_state();

    let (status, body) = call_raw(state, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body).unwrap().contains("Search"));
}

#[tokio::test]
async fn test_index_page_missing_is_500() {
    let (state, _dir) = make_default_state();
    let state = without_index_page(state);

    let (status, _body) = call_raw(state, "/").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_health_returns_ok() {
    let (state, _dir) = make_default_state();

    let (status, json) = call(state, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}
