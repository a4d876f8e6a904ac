#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use writeflow_lib::db::Database;
use writeflow_lib::error::AppError;
use writeflow_lib::providers::{
    DetectionProvider, GenerationOptions, GenerativeProvider, GrammarProvider, ProviderRegistry,
};
use writeflow_lib::routes::build_router;
use writeflow_lib::state::AppState;
use writeflow_lib::types::{AiCheckResult, ChatTurn, GrammarResult, Metrics};

/// Each test gets its own named shared-cache in-memory database so the dual
/// read/write pools see the same data.
pub async fn test_db() -> Arc<Database> {
    let url = format!(
        "sqlite:file:wf_test_{}?mode=memory&cache=shared",
        uuid::Uuid::new_v4().simple()
    );
    Arc::new(Database::connect(&url, 2).await.expect("memory sqlite"))
}

pub async fn state_with_registry(registry: ProviderRegistry) -> AppState {
    AppState::from_parts(test_db().await, Arc::new(registry))
        .await
        .expect("app state")
}

/// Mock-only state: no credentials configured.
pub async fn mock_state() -> AppState {
    state_with_registry(ProviderRegistry::new(Vec::new(), None, None)).await
}

pub async fn mock_router() -> Router {
    build_router(mock_state().await)
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .expect("request"),
        )
        .await
        .expect("response")
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
        .await
        .expect("response")
}

pub async fn delete(app: &Router, uri: &str) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response")
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

pub fn assert_status(response: &Response<Body>, expected: StatusCode) {
    assert_eq!(response.status(), expected, "unexpected status");
}

// --- counting/failing stub providers -------------------------------------

#[derive(Clone, Default)]
pub struct Counter(pub Arc<AtomicUsize>);

impl Counter {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct StubGenerative {
    pub calls: Counter,
    pub reply: Option<String>,
}

impl StubGenerative {
    pub fn succeeding(reply: &str) -> (Arc<Self>, Counter) {
        let calls = Counter::default();
        let stub = Arc::new(Self {
            calls: calls.clone(),
            reply: Some(reply.to_string()),
        });
        (stub, calls)
    }

    pub fn failing() -> (Arc<Self>, Counter) {
        let calls = Counter::default();
        let stub = Arc::new(Self {
            calls: calls.clone(),
            reply: None,
        });
        (stub, calls)
    }
}

#[async_trait]
impl GenerativeProvider for StubGenerative {
    fn name(&self) -> &'static str {
        "stub-generative"
    }

    async fn complete(&self, _prompt: &str, _opts: &GenerationOptions) -> Result<String, AppError> {
        self.calls.0.fetch_add(1, Ordering::SeqCst);
        self.reply
            .clone()
            .ok_or_else(|| AppError::provider("stub-generative", "forced failure"))
    }

    async fn chat(&self, _turns: &[ChatTurn], _opts: &GenerationOptions) -> Result<String, AppError> {
        self.calls.0.fetch_add(1, Ordering::SeqCst);
        self.reply
            .clone()
            .ok_or_else(|| AppError::provider("stub-generative", "forced failure"))
    }
}

pub struct StubGrammar {
    pub calls: Counter,
    pub result: Option<GrammarResult>,
}

impl StubGrammar {
    pub fn failing() -> (Arc<Self>, Counter) {
        let calls = Counter::default();
        let stub = Arc::new(Self {
            calls: calls.clone(),
            result: None,
        });
        (stub, calls)
    }
}

#[async_trait]
impl GrammarProvider for StubGrammar {
    fn name(&self) -> &'static str {
        "stub-grammar"
    }

    async fn check(&self, _text: &str, _language: &str) -> Result<GrammarResult, AppError> {
        self.calls.0.fetch_add(1, Ordering::SeqCst);
        self.result
            .clone()
            .ok_or_else(|| AppError::provider("stub-grammar", "forced failure"))
    }
}

pub struct StubDetector {
    pub calls: Counter,
    pub result: Option<AiCheckResult>,
}

impl StubDetector {
    pub fn failing() -> (Arc<Self>, Counter) {
        let calls = Counter::default();
        let stub = Arc::new(Self {
            calls: calls.clone(),
            result: None,
        });
        (stub, calls)
    }
}

#[async_trait]
impl DetectionProvider for StubDetector {
    fn name(&self) -> &'static str {
        "stub-detector"
    }

    async fn detect(&self, _text: &str) -> Result<AiCheckResult, AppError> {
        self.calls.0.fetch_add(1, Ordering::SeqCst);
        self.result
            .clone()
            .ok_or_else(|| AppError::provider("stub-detector", "forced failure"))
    }
}

pub fn metrics_in_bounds(metrics: &Metrics) -> bool {
    metrics.correctness <= 100
        && metrics.clarity <= 100
        && metrics.engagement <= 100
        && metrics.delivery <= 100
}
