use async_trait::async_trait;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::providers::GrammarProvider;
use crate::services::scoring;
use crate::types::{GrammarResult, Highlight, Suggestion};

const NAME: &str = "languagetool";

pub struct LanguageToolProvider {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct CheckResponse {
    matches: Vec<Match>,
}

#[derive(Deserialize)]
struct Match {
    message: String,
    offset: usize,
    length: usize,
    replacements: Vec<Replacement>,
    rule: Option<Rule>,
}

#[derive(Deserialize)]
struct Replacement {
    value: String,
}

#[derive(Deserialize)]
struct Rule {
    #[serde(rename = "issueType")]
    issue_type: Option<String>,
}

impl LanguageToolProvider {
    pub fn new(base_url: String, client: reqwest::Client) -> Self {
        Self { base_url, client }
    }
}

#[async_trait]
impl GrammarProvider for LanguageToolProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn check(&self, text: &str, language: &str) -> Result<GrammarResult, AppError> {
        let url = format!("{}/v2/check", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .form(&[("text", text), ("language", language)])
            .send()
            .await
            .map_err(|e| AppError::provider(NAME, e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::provider(NAME, format!("{status}: {error_text}")));
        }

        let parsed: CheckResponse = response
            .json()
            .await
            .map_err(|e| AppError::provider(NAME, format!("malformed response: {e}")))?;

        Ok(normalize(text, parsed))
    }
}

/// Turns LanguageTool matches into the shared highlight/suggestion shapes and
/// applies the top replacement of each match to produce the corrected text.
fn normalize(text: &str, response: CheckResponse) -> GrammarResult {
    let chars: Vec<char> = text.chars().collect();
    let mut highlights = Vec::new();
    let mut suggestions = Vec::new();

    for m in &response.matches {
        let end = (m.offset + m.length).min(chars.len());
        let start = m.offset.min(end);
        let flagged: String = chars[start..end].iter().collect();
        let kind = m
            .rule
            .as_ref()
            .and_then(|r| r.issue_type.clone())
            .unwrap_or_else(|| "grammar".to_string());
        let replacement = m.replacements.first().map(|r| r.value.clone());

        highlights.push(Highlight {
            kind: kind.clone(),
            start,
            end,
            suggestion: replacement.clone(),
            message: Some(m.message.clone()),
        });

        if let Some(replacement) = replacement {
            suggestions.push(Suggestion {
                id: Uuid::new_v4(),
                kind,
                text: flagged,
                replacement,
                description: m.message.clone(),
            });
        }
    }

    // Replacements applied right-to-left so earlier offsets stay valid.
    let mut corrected_chars = chars;
    let mut ordered: Vec<&Match> = response.matches.iter().collect();
    ordered.sort_by(|a, b| b.offset.cmp(&a.offset));
    for m in ordered {
        if let Some(replacement) = m.replacements.first() {
            let end = (m.offset + m.length).min(corrected_chars.len());
            let start = m.offset.min(end);
            corrected_chars.splice(start..end, replacement.value.chars());
        }
    }
    let corrected: String = corrected_chars.into_iter().collect();

    let metrics = scoring::compute_metrics(text, highlights.len());

    GrammarResult {
        corrected,
        highlights,
        suggestions,
        metrics,
    }
}
