//! Unified dispatch endpoint. Text modes reply with the matching result
//! object; chat replies as JSON or as newline-delimited JSON chunks when
//! `stream: true`.

use axum::body::Body;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tokio_stream::StreamExt;

use crate::error::AppError;
use crate::log_error;
use crate::services::dispatch::DispatchService;
use crate::state::AppState;
use crate::types::{AiRequest, ChatReply, ChatRole, ChatTurn, Mode, ValidatedRequest};

#[derive(Serialize)]
struct StreamChunk<'a> {
    response: &'a str,
}

pub async fn process(
    State(state): State<AppState>,
    Json(request): Json<AiRequest>,
) -> Result<Response, AppError> {
    match request.validate()? {
        ValidatedRequest::Text {
            mode,
            text,
            style,
            custom_tone,
        } => {
            let tone = custom_tone.as_deref();
            let response = match mode {
                Mode::Grammar => Json(state.dispatch.grammar(&text, "en-US").await).into_response(),
                Mode::Paraphrase => {
                    Json(state.dispatch.paraphrase(&text, style, tone).await).into_response()
                }
                Mode::Humanize => {
                    Json(state.dispatch.humanize(&text, style, tone).await).into_response()
                }
                Mode::Aicheck => Json(state.dispatch.ai_check(&text).await).into_response(),
                Mode::Chat => unreachable!("chat is not a text mode"),
            };
            Ok(response)
        }
        ValidatedRequest::Chat {
            messages,
            stream,
            session_id,
        } => chat(&state, messages, stream, session_id).await,
    }
}

async fn chat(
    state: &AppState,
    messages: Vec<ChatTurn>,
    stream: bool,
    session_id: Option<i64>,
) -> Result<Response, AppError> {
    // The user turn is persisted before dispatch; a missing session is a 404
    // before any provider is called.
    if let Some(sid) = session_id {
        if let Some(turn) = messages.iter().rev().find(|t| t.role == ChatRole::User) {
            state
                .chat_repo
                .insert_message(sid, turn.role.as_str(), &turn.content)
                .await?;
        }
    }

    let reply = state.dispatch.chat(&messages).await;

    // A failed assistant write degrades gracefully: the client still gets the
    // full reply, the failure is visible in the logs.
    if let Some(sid) = session_id {
        if let Err(e) = state.chat_repo.insert_message(sid, "assistant", &reply).await {
            log_error!(
                "writeflow.routes",
                "failed to persist assistant message for session {sid}: {e}"
            );
        }
    }

    if !stream {
        return Ok(Json(ChatReply {
            response: reply,
            session_id,
        })
        .into_response());
    }

    let chunks = DispatchService::stream_reply(reply).map(|chunk| {
        let line = serde_json::to_string(&StreamChunk { response: &chunk }).unwrap_or_default();
        Ok::<_, std::convert::Infallible>(axum::body::Bytes::from(format!("{line}\n")))
    });

    let response = Response::builder()
        .header(header::CONTENT_TYPE, "application/x-ndjson")
        .body(Body::from_stream(chunks))
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(response)
}
