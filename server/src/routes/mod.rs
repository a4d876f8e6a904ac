use axum::extract::State;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod persistence;
pub mod process;
pub mod tools;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/grammar-check", post(tools::grammar_check))
        .route("/api/paraphrase", post(tools::paraphrase))
        .route("/api/humanize", post(tools::humanize))
        .route("/api/ai-check", post(tools::ai_check))
        .route("/api/ai/process", post(process::process))
        .route(
            "/api/db/chat-sessions",
            post(persistence::create_session).get(persistence::list_sessions),
        )
        .route("/api/db/chat-sessions/:id", delete(persistence::delete_session))
        .route(
            "/api/db/chat-sessions/:id/messages",
            get(persistence::list_messages).post(persistence::create_message),
        )
        .route(
            "/api/db/writing-entries",
            post(persistence::create_entry).get(persistence::list_entries),
        )
        .route(
            "/api/db/writing-entries/:id",
            get(persistence::get_entry)
                .patch(persistence::update_entry)
                .delete(persistence::delete_entry),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthStatus {
    status: &'static str,
    providers: Vec<&'static str>,
    mock_only: bool,
}

async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        providers: state.registry.live_providers(),
        mock_only: state.registry.is_mock_only(),
    })
}
