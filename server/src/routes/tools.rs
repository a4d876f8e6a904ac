//! Per-tool endpoints. Validation happens here, before the dispatcher; a
//! rejected request never touches a provider client.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::error::AppError;
use crate::log_info;
use crate::state::AppState;
use crate::types::{
    validate_text, AiCheckResult, GrammarResult, HumanizeResult, ParaphraseResult, Style,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrammarCheckBody {
    pub text: Option<String>,
    pub language: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteBody {
    pub text: Option<String>,
    pub style: Option<Style>,
    pub custom_tone: Option<String>,
}

#[derive(Deserialize)]
pub struct AiCheckBody {
    pub text: Option<String>,
}

pub async fn grammar_check(
    State(state): State<AppState>,
    Json(body): Json<GrammarCheckBody>,
) -> Result<Json<GrammarResult>, AppError> {
    let text = validate_text(body.text.as_deref())?;
    let language = body.language.as_deref().unwrap_or("en-US");
    log_info!("writeflow.routes", "grammar-check: {} chars", text.chars().count());

    Ok(Json(state.dispatch.grammar(&text, language).await))
}

pub async fn paraphrase(
    State(state): State<AppState>,
    Json(body): Json<RewriteBody>,
) -> Result<Json<ParaphraseResult>, AppError> {
    let text = validate_text(body.text.as_deref())?;
    let style = body.style.unwrap_or_default();
    log_info!("writeflow.routes", "paraphrase: {} chars", text.chars().count());

    Ok(Json(
        state
            .dispatch
            .paraphrase(&text, style, body.custom_tone.as_deref())
            .await,
    ))
}

pub async fn humanize(
    State(state): State<AppState>,
    Json(body): Json<RewriteBody>,
) -> Result<Json<HumanizeResult>, AppError> {
    let text = validate_text(body.text.as_deref())?;
    let style = body.style.unwrap_or_default();
    log_info!("writeflow.routes", "humanize: {} chars", text.chars().count());

    Ok(Json(
        state
            .dispatch
            .humanize(&text, style, body.custom_tone.as_deref())
            .await,
    ))
}

pub async fn ai_check(
    State(state): State<AppState>,
    Json(body): Json<AiCheckBody>,
) -> Result<Json<AiCheckResult>, AppError> {
    let text = validate_text(body.text.as_deref())?;
    log_info!("writeflow.routes", "ai-check: {} chars", text.chars().count());

    Ok(Json(state.dispatch.ai_check(&text).await))
}
