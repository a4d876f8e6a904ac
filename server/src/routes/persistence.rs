//! Conventional REST CRUD over the repositories. "Not found" is a 404, a
//! database failure is a 500; there are no sentinel returns.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::db::models::{ChatMessage, ChatSession, UpdateWritingEntry, WritingEntry};
use crate::error::AppError;
use crate::state::AppState;
use crate::types::ChatRole;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionBody {
    pub user_id: Option<i64>,
    pub title: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerQuery {
    pub user_id: Option<i64>,
}

#[derive(Deserialize)]
pub struct CreateMessageBody {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryBody {
    pub user_id: Option<i64>,
    pub title: String,
    pub input_text: String,
}

pub async fn create_session(
    State(state): State<AppState>,
    Json(body): Json<CreateSessionBody>,
) -> Result<Json<ChatSession>, AppError> {
    let user = state.user_repo.resolve_user(body.user_id).await?;
    let session = state
        .chat_repo
        .create_session(user.id, body.title.as_deref())
        .await?;
    Ok(Json(session))
}

pub async fn list_sessions(
    State(state): State<AppState>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<Vec<ChatSession>>, AppError> {
    let user = state.user_repo.resolve_user(query.user_id).await?;
    Ok(Json(state.chat_repo.list_sessions(user.id).await?))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.chat_repo.delete_session(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_messages(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<ChatMessage>>, AppError> {
    state
        .chat_repo
        .get_session(id)
        .await?
        .ok_or_else(|| AppError::NotFound {
            entity: "chat_session".to_string(),
            id: id.to_string(),
        })?;
    Ok(Json(state.chat_repo.list_messages(id).await?))
}

pub async fn create_message(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<CreateMessageBody>,
) -> Result<Json<ChatMessage>, AppError> {
    if body.content.trim().is_empty() {
        return Err(AppError::validation("content", "content must be non-empty"));
    }
    let message = state
        .chat_repo
        .insert_message(id, body.role.as_str(), &body.content)
        .await?;
    Ok(Json(message))
}

pub async fn create_entry(
    State(state): State<AppState>,
    Json(body): Json<CreateEntryBody>,
) -> Result<Json<WritingEntry>, AppError> {
    if body.title.trim().is_empty() {
        return Err(AppError::validation("title", "title must be non-empty"));
    }
    let user = state.user_repo.resolve_user(body.user_id).await?;
    let entry = state
        .writing_repo
        .create_entry(user.id, &body.title, &body.input_text)
        .await?;
    Ok(Json(entry))
}

pub async fn list_entries(
    State(state): State<AppState>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<Vec<WritingEntry>>, AppError> {
    let user = state.user_repo.resolve_user(query.user_id).await?;
    Ok(Json(state.writing_repo.list_entries(user.id).await?))
}

pub async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<WritingEntry>, AppError> {
    let entry = state
        .writing_repo
        .get_entry(id)
        .await?
        .ok_or_else(|| AppError::NotFound {
            entity: "writing_entry".to_string(),
            id: id.to_string(),
        })?;
    Ok(Json(entry))
}

pub async fn update_entry(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateWritingEntry>,
) -> Result<Json<WritingEntry>, AppError> {
    Ok(Json(state.writing_repo.update_entry(id, body).await?))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.writing_repo.delete_entry(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
