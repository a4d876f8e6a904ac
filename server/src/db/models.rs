use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: i64,
    pub user_id: i64,
    pub title: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: i64,
    pub session_id: i64,
    pub role: String,
    pub content: String,
    pub created_at: String,
}

/// One row per tool invocation; the result columns hold the JSON result
/// objects the tool endpoints return, written back by the client's autosave.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WritingEntry {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub input_text: String,
    pub grammar_result: Option<Json<Value>>,
    pub paraphrase_result: Option<Json<Value>>,
    pub ai_check_result: Option<Json<Value>>,
    pub humanizer_result: Option<Json<Value>>,
    pub is_favorite: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWritingEntry {
    pub title: Option<String>,
    pub input_text: Option<String>,
    pub grammar_result: Option<Value>,
    pub paraphrase_result: Option<Value>,
    pub ai_check_result: Option<Value>,
    pub humanizer_result: Option<Value>,
    pub is_favorite: Option<bool>,
}
