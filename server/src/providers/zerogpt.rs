use async_trait::async_trait;
use serde_json::Value;

use crate::error::AppError;
use crate::providers::DetectionProvider;
use crate::services::scoring;
use crate::types::{AiCheckResult, Highlight};

const NAME: &str = "zerogpt";
const URL: &str = "https://api.zerogpt.com/api/detect/detectText";

pub struct ZeroGptProvider {
    api_key: String,
    client: reqwest::Client,
}

impl ZeroGptProvider {
    pub fn new(api_key: String, client: reqwest::Client) -> Self {
        Self { api_key, client }
    }
}

#[async_trait]
impl DetectionProvider for ZeroGptProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn detect(&self, text: &str) -> Result<AiCheckResult, AppError> {
        let response = self
            .client
            .post(URL)
            .header("ApiKey", &self.api_key)
            .json(&serde_json::json!({ "input_text": text }))
            .send()
            .await
            .map_err(|e| AppError::provider(NAME, e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::provider(NAME, format!("{status}: {error_text}")));
        }

        // Field-picked defensively: the vendor reshuffles this payload.
        let body: Value = response
            .json()
            .await
            .map_err(|e| AppError::provider(NAME, format!("malformed response: {e}")))?;

        let data = body
            .get("data")
            .ok_or_else(|| AppError::provider(NAME, "missing data in response"))?;

        let percentage = data
            .get("fakePercentage")
            .and_then(Value::as_f64)
            .ok_or_else(|| AppError::provider(NAME, "missing data.fakePercentage"))?;

        let flagged_sentences: Vec<&str> = data
            .get("h")
            .and_then(Value::as_array)
            .map(|arr| arr.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let highlights = flagged_sentences
            .iter()
            .filter_map(|sentence| locate(text, sentence))
            .collect::<Vec<_>>();

        Ok(AiCheckResult {
            ai_percentage: percentage.clamp(0.0, 100.0).round() as u8,
            highlights,
            suggestions: Vec::new(),
            metrics: scoring::compute_metrics(text, flagged_sentences.len()),
        })
    }
}

fn locate(text: &str, sentence: &str) -> Option<Highlight> {
    let needle = sentence.trim();
    if needle.is_empty() {
        return None;
    }
    let byte_start = text.find(needle)?;
    let start = text[..byte_start].chars().count();
    let end = start + needle.chars().count();
    Some(Highlight {
        kind: "ai-generated".to_string(),
        start,
        end,
        suggestion: None,
        message: Some("Sentence flagged as likely AI-generated".to_string()),
    })
}
