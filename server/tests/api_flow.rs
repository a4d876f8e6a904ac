//! End-to-end flows against the full router with no credentials configured:
//! the mock generator serves every capability and persistence runs on an
//! in-memory database.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use writeflow_lib::providers::ProviderRegistry;
use writeflow_lib::routes::build_router;
use writeflow_lib::state::AppState;

use common::{assert_status, body_json, body_text, delete, get, mock_router, post_json};

#[tokio::test]
async fn grammar_check_without_credentials() {
    let app = mock_router().await;

    let response = post_json(&app, "/api/grammar-check", json!({"text": "He go to school."})).await;
    assert_status(&response, StatusCode::OK);

    let body = body_json(response).await;
    assert!(body["suggestions"].as_array().unwrap().len() >= 1);
    assert!(body["corrected"].as_str().unwrap().contains("goes"));
    let correctness = body["metrics"]["correctness"].as_u64().unwrap();
    assert!(correctness <= 100);
}

#[tokio::test]
async fn unified_chat_returns_non_empty_response() {
    let app = mock_router().await;

    let response = post_json(
        &app,
        "/api/ai/process",
        json!({"mode": "chat", "messages": [{"role": "user", "content": "hi"}]}),
    )
    .await;
    assert_status(&response, StatusCode::OK);

    let body = body_json(response).await;
    assert!(!body["response"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn streaming_chat_yields_ndjson_chunks() {
    let app = mock_router().await;

    let response = post_json(
        &app,
        "/api/ai/process",
        json!({"mode": "chat", "stream": true, "messages": [{"role": "user", "content": "hi"}]}),
    )
    .await;
    assert_status(&response, StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/x-ndjson"
    );

    let raw = body_text(response).await;
    let chunks: Vec<serde_json::Value> = raw
        .lines()
        .map(|line| serde_json::from_str(line).expect("each line is a JSON object"))
        .collect();
    assert!(!chunks.is_empty());
    let rebuilt: String = chunks
        .iter()
        .map(|c| c["response"].as_str().unwrap())
        .collect();
    assert!(!rebuilt.trim().is_empty());
}

#[tokio::test]
async fn chat_session_messages_in_insertion_order() {
    let app = mock_router().await;

    let response = post_json(&app, "/api/db/chat-sessions", json!({})).await;
    assert_status(&response, StatusCode::OK);
    let session = body_json(response).await;
    let session_id = session["id"].as_i64().unwrap();

    for content in ["first", "second", "third"] {
        let response = post_json(
            &app,
            &format!("/api/db/chat-sessions/{session_id}/messages"),
            json!({"role": "user", "content": content}),
        )
        .await;
        assert_status(&response, StatusCode::OK);
    }

    let response = get(&app, &format!("/api/db/chat-sessions/{session_id}/messages")).await;
    assert_status(&response, StatusCode::OK);
    let messages = body_json(response).await;
    let contents: Vec<&str> = messages
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, vec!["first", "second", "third"]);

    // untitled sessions take their title from the first user message
    let response = get(&app, "/api/db/chat-sessions").await;
    let sessions = body_json(response).await;
    let ours = sessions
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["id"].as_i64() == Some(session_id))
        .unwrap();
    assert_eq!(ours["title"], "first");
}

#[tokio::test]
async fn deleting_a_session_leaves_no_orphaned_messages() {
    let db = common::test_db().await;
    let state = AppState::from_parts(db.clone(), std::sync::Arc::new(ProviderRegistry::new(Vec::new(), None, None)))
        .await
        .expect("state");
    let app = build_router(state);

    let session = body_json(post_json(&app, "/api/db/chat-sessions", json!({})).await).await;
    let session_id = session["id"].as_i64().unwrap();

    for _ in 0..3 {
        post_json(
            &app,
            &format!("/api/db/chat-sessions/{session_id}/messages"),
            json!({"role": "user", "content": "row"}),
        )
        .await;
    }

    let response = delete(&app, &format!("/api/db/chat-sessions/{session_id}")).await;
    assert_status(&response, StatusCode::NO_CONTENT);

    let orphans: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM chat_messages WHERE session_id = ?1")
            .bind(session_id)
            .fetch_one(db.read_pool())
            .await
            .expect("count");
    assert_eq!(orphans, 0);

    // the session row itself is gone too
    let response = get(&app, &format!("/api/db/chat-sessions/{session_id}/messages")).await;
    assert_status(&response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn chat_with_session_persists_both_turns() {
    let app = mock_router().await;

    let session = body_json(post_json(&app, "/api/db/chat-sessions", json!({})).await).await;
    let session_id = session["id"].as_i64().unwrap();

    let response = post_json(
        &app,
        "/api/ai/process",
        json!({
            "mode": "chat",
            "sessionId": session_id,
            "messages": [{"role": "user", "content": "hello there"}]
        }),
    )
    .await;
    assert_status(&response, StatusCode::OK);

    let messages = body_json(get(&app, &format!("/api/db/chat-sessions/{session_id}/messages")).await).await;
    let roles: Vec<&str> = messages
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["role"].as_str().unwrap())
        .collect();
    assert_eq!(roles, vec!["user", "assistant"]);

    // unknown session rejected before dispatch
    let response = post_json(
        &app,
        "/api/ai/process",
        json!({
            "mode": "chat",
            "sessionId": 999_999,
            "messages": [{"role": "user", "content": "hello there"}]
        }),
    )
    .await;
    assert_status(&response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn writing_entry_autosave_roundtrip() {
    let app = mock_router().await;

    let entry = body_json(
        post_json(
            &app,
            "/api/db/writing-entries",
            json!({"title": "Draft one", "inputText": "He go to school."}),
        )
        .await,
    )
    .await;
    let entry_id = entry["id"].as_i64().unwrap();
    assert_eq!(entry["isFavorite"], 0);

    let patched = body_json(
        app_patch(
            &app,
            &format!("/api/db/writing-entries/{entry_id}"),
            json!({
                "inputText": "He goes to school.",
                "grammarResult": {"corrected": "He goes to school."},
                "isFavorite": true
            }),
        )
        .await,
    )
    .await;
    assert_eq!(patched["inputText"], "He goes to school.");
    assert_eq!(patched["isFavorite"], 1);
    assert_eq!(patched["title"], "Draft one");
    assert_eq!(patched["grammarResult"]["corrected"], "He goes to school.");

    let response = delete(&app, &format!("/api/db/writing-entries/{entry_id}")).await;
    assert_status(&response, StatusCode::NO_CONTENT);

    let response = get(&app, &format!("/api/db/writing-entries/{entry_id}")).await;
    assert_status(&response, StatusCode::NOT_FOUND);
}

async fn app_patch(
    app: &axum::Router,
    uri: &str,
    body: serde_json::Value,
) -> axum::http::Response<axum::body::Body> {
    use tower::ServiceExt;
    app.clone()
        .oneshot(
            axum::http::Request::builder()
                .method("PATCH")
                .uri(uri)
                .header("content-type", "application/json")
                .body(axum::body::Body::from(body.to_string()))
                .expect("request"),
        )
        .await
        .expect("response")
}
