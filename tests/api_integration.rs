//! Integration tests for the HTTP surface
//!
//! Drives the full router with an in-process scripted backend; no network
//! access or API key needed.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use fanout_rag::{
    backend::{BackendError, ScriptedBackend},
    config::Config,
    logging::{FileRequestLogger, MemoryRequestLogger},
    server::{router, AppState},
};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

fn app(backend: ScriptedBackend) -> (Router, MemoryRequestLogger) {
    let logger = MemoryRequestLogger::new();
    let state = AppState::from_config(&Config::default(), Arc::new(backend), Arc::new(logger.clone())).unwrap();
    (router(Arc::new(state)), logger)
}

async fn send(app: Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_chat_returns_one_result_per_model_in_order() {
    let backend = ScriptedBackend::new()
        .with_reply("gpt-4", "Hi from four")
        .with_reply("gpt-3.5-turbo", "Hi from three");
    let (app, _) = app(backend);

    let (status, body) = send(
        app,
        "POST",
        "/api/chat",
        Some(r#"{"message":"Hello","messages":[],"models":["gpt-4","gpt-3.5-turbo"]}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let responses = body["responses"].as_array().unwrap();
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["model"], "gpt-4");
    assert_eq!(responses[0]["content"], "Hi from four");
    assert_eq!(responses[1]["model"], "gpt-3.5-turbo");
    assert_eq!(responses[1]["content"], "Hi from three");
    assert!(body["timing"]["total"].is_u64());
}

#[tokio::test]
async fn test_chat_history_reaches_backend() {
    let backend = ScriptedBackend::new();
    let (app, _) = app(backend.clone());

    let (status, _) = send(
        app,
        "POST",
        "/api/chat",
        Some(
            r#"{
                "message": "and you?",
                "messages": [
                    {"role": "user", "content": "I am fine"},
                    {"role": "assistant", "content": "Good", "model": "gpt-4"}
                ],
                "models": ["gpt-4"]
            }"#,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let calls = backend.calls();
    assert_eq!(calls.len(), 1);
    let contents: Vec<&str> = calls[0].messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["I am fine", "Good", "and you?"]);
}

#[tokio::test]
async fn test_chat_falls_back_when_model_missing() {
    let backend = ScriptedBackend::new()
        .with_failure("gpt-4", BackendError::NotFound("The model `gpt-4` does not exist".into()))
        .with_reply("gpt-3.5-turbo", "fallback answer");
    let (app, logger) = app(backend);

    let (status, body) = send(
        app,
        "POST",
        "/api/chat",
        Some(r#"{"message":"Hello","models":["gpt-4"]}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["responses"][0]["model"], "gpt-4 (fallback to gpt-3.5-turbo)");
    assert_eq!(body["responses"][0]["content"], "fallback answer");
    assert!(logger.events().iter().any(|(_, e)| e.name() == "fallback"));
}

#[tokio::test]
async fn test_chat_failure_is_contained_per_model() {
    let backend = ScriptedBackend::new()
        .with_failure("gpt-3.5-turbo", BackendError::RateLimited("Rate limit reached".into()))
        .with_reply("gpt-4", "fine");
    let (app, _) = app(backend);

    let (status, body) = send(
        app,
        "POST",
        "/api/chat",
        Some(r#"{"message":"Hello","models":["gpt-3.5-turbo","gpt-4"]}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let failed = body["responses"][0]["content"].as_str().unwrap();
    assert!(failed.starts_with("Error: "));
    assert!(failed.contains("Rate limit reached"));
    assert_eq!(body["responses"][1]["content"], "fine");
}

#[tokio::test]
async fn test_rag_returns_ranked_sources() {
    let backend = ScriptedBackend::new().with_reply("gpt-3.5-turbo", "RAG combines retrieval with generation.");
    let (app, _) = app(backend);

    let (status, body) = send(
        app,
        "POST",
        "/api/rag",
        Some(r#"{"message":"What is RAG?","messages":[]}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "RAG combines retrieval with generation.");

    let sources = body["sources"].as_array().unwrap();
    assert!(!sources.is_empty() && sources.len() <= 2);
    let relevances: Vec<f64> = sources.iter().map(|s| s["relevance"].as_f64().unwrap()).collect();
    for r in &relevances {
        assert!((0.5..=1.0).contains(r), "relevance {} out of range", r);
    }
    assert!(relevances.windows(2).all(|w| w[0] >= w[1]));
    assert!(sources.iter().all(|s| s["title"].is_string() && s["content"].is_string()));
}

#[tokio::test]
async fn test_rag_backend_failure_is_server_error() {
    let backend = ScriptedBackend::new()
        .with_failure("gpt-3.5-turbo", BackendError::Unauthorized("Incorrect API key".into()));
    let (app, logger) = app(backend);

    let (status, body) = send(app, "POST", "/api/rag", Some(r#"{"message":"What is RAG?"}"#)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("Incorrect API key"));
    assert!(logger.events().iter().any(|(_, e)| e.name() == "request_failed"));
}

#[tokio::test]
async fn test_missing_message_is_rejected_before_backend() {
    let backend = ScriptedBackend::new();
    let (app, logger) = app(backend.clone());

    let (status, body) = send(app.clone(), "POST", "/api/chat", Some(r#"{"models":["gpt-4"]}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Message is required");

    let (status, body) = send(app, "POST", "/api/rag", Some(r#"{"messages":[]}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Message is required");

    assert_eq!(backend.call_count(), 0);
    assert!(logger.events().iter().all(|(_, e)| e.name() == "request_failed"));
}

#[tokio::test]
async fn test_bad_requests() {
    let backend = ScriptedBackend::new();
    let (app, _) = app(backend.clone());

    let cases = [
        ("/api/chat", r#"{"message":"hi","models":[]}"#),
        ("/api/chat", r#"{"message":"hi","models":["no-such-model"]}"#),
        ("/api/chat", r#"{"message":"hi","models":["gpt-4"],"messages":[{"role":"system","content":"x"}]}"#),
        ("/api/rag", r#"{"message":"hi","messages":[{"role":"user"}]}"#),
        ("/api/rag", "{not json"),
    ];

    for (uri, body) in cases {
        let (status, response) = send(app.clone(), "POST", uri, Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
        assert!(response["error"].is_string());
    }
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn test_health_and_models() {
    let (app, _) = app(ScriptedBackend::new());

    let (status, body) = send(app.clone(), "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(app, "GET", "/api/models", None).await;
    assert_eq!(status, StatusCode::OK);
    let models = body.as_array().unwrap();
    assert_eq!(models.len(), 2);
    assert_eq!(models[0]["id"], "gpt-4");
    assert_eq!(models[0]["fallback"], "gpt-3.5-turbo");
    assert_eq!(models[1]["id"], "gpt-3.5-turbo");
    assert!(models[1]["fallback"].is_null());
    assert_eq!(models[1]["max_tokens"], 4000);
}

#[tokio::test]
async fn test_request_log_written_to_file() {
    let temp = TempDir::new().unwrap();
    let logger = FileRequestLogger::new(temp.path(), "api.log").unwrap();
    let path = logger.path().to_path_buf();
    let state = AppState::from_config(&Config::default(), Arc::new(ScriptedBackend::new()), Arc::new(logger)).unwrap();
    let app = router(Arc::new(state));

    let (status, _) = send(
        app,
        "POST",
        "/api/chat",
        Some(r#"{"message":"Hello","models":["gpt-4","gpt-3.5-turbo"]}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let log = std::fs::read_to_string(path).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert!(lines.first().unwrap().contains("chat_request"));
    assert!(lines.last().unwrap().contains("chat_completed"));
    assert_eq!(lines.iter().filter(|l| l.contains("model_response")).count(), 2);
}

#[tokio::test]
async fn test_multiline_model_id_stays_on_one_log_line() {
    let temp = TempDir::new().unwrap();
    let logger = FileRequestLogger::new(temp.path(), "api.log").unwrap();
    let path = logger.path().to_path_buf();
    let state = AppState::from_config(&Config::default(), Arc::new(ScriptedBackend::new()), Arc::new(logger)).unwrap();
    let app = router(Arc::new(state));

    let body = serde_json::json!({
        "message": "Hello",
        "models": ["gpt-4\n[2099-01-01T00:00:00.000Z] [00000000-0000-0000-0000-000000000000] chat_completed responses=9 total=1ms"],
    })
    .to_string();
    let (status, _) = send(app, "POST", "/api/chat", Some(&body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let log = std::fs::read_to_string(path).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 2, "log: {}", log);
    assert!(lines[0].contains("chat_request"));
    assert!(lines[1].contains("request_failed"));
    assert!(!lines.iter().any(|l| l.starts_with("[2099")));
}
