//! Request validation happens before dispatch: a rejected body returns 400
//! and never reaches a provider client.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use writeflow_lib::providers::ProviderRegistry;
use writeflow_lib::routes::build_router;

use common::{
    assert_status, body_json, mock_router, post_json, state_with_registry, StubDetector,
    StubGenerative, StubGrammar,
};

#[tokio::test]
async fn missing_required_field_returns_400_without_touching_providers() {
    let (generative, gen_calls) = StubGenerative::succeeding("ok");
    let (grammar, grammar_calls) = StubGrammar::failing();
    let (detector, detector_calls) = StubDetector::failing();

    let registry = ProviderRegistry::new(vec![generative], Some(grammar), Some(detector));
    let app = build_router(state_with_registry(registry).await);

    for uri in [
        "/api/grammar-check",
        "/api/paraphrase",
        "/api/humanize",
        "/api/ai-check",
    ] {
        let response = post_json(&app, uri, json!({})).await;
        assert_status(&response, StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "validation");
        assert!(body["message"].as_str().unwrap().contains("text"));
    }

    // unified endpoint: text mode without text, chat without messages
    let response = post_json(&app, "/api/ai/process", json!({"mode": "grammar"})).await;
    assert_status(&response, StatusCode::BAD_REQUEST);

    let response = post_json(&app, "/api/ai/process", json!({"mode": "chat", "messages": []})).await;
    assert_status(&response, StatusCode::BAD_REQUEST);

    assert_eq!(gen_calls.count(), 0);
    assert_eq!(grammar_calls.count(), 0);
    assert_eq!(detector_calls.count(), 0);
}

#[tokio::test]
async fn text_length_boundaries() {
    let app = mock_router().await;

    let cases = [
        (2, StatusCode::BAD_REQUEST),
        (3, StatusCode::OK),
        (10_000, StatusCode::OK),
        (10_001, StatusCode::BAD_REQUEST),
    ];

    for (len, expected) in cases {
        let text = "a".repeat(len);
        let response = post_json(&app, "/api/grammar-check", json!({ "text": text })).await;
        assert_eq!(response.status(), expected, "length {len}");
    }
}

#[tokio::test]
async fn chat_message_limits_rejected() {
    let app = mock_router().await;

    let too_many: Vec<_> = (0..51).map(|_| json!({"role": "user", "content": "hi"})).collect();
    let response = post_json(
        &app,
        "/api/ai/process",
        json!({"mode": "chat", "messages": too_many}),
    )
    .await;
    assert_status(&response, StatusCode::BAD_REQUEST);

    let oversized = "x".repeat(4_001);
    let response = post_json(
        &app,
        "/api/ai/process",
        json!({"mode": "chat", "messages": [{"role": "user", "content": oversized}]}),
    )
    .await;
    assert_status(&response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_reports_mock_only() {
    let app = mock_router().await;
    let response = common::get(&app, "/health").await;
    assert_status(&response, StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["mockOnly"], true);
    assert!(body["providers"].as_array().unwrap().is_empty());
}
