use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::providers::{GenerationOptions, GenerativeProvider};
use crate::types::{ChatRole, ChatTurn};

const NAME: &str = "gemini";
const MODEL: &str = "gemini-1.5-flash";

pub struct GeminiProvider {
    api_key: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Serialize)]
struct GeminiContent {
    role: &'static str,
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Serialize)]
struct GeminiGenerationConfig {
    temperature: f32,
    #[serde(rename = "topK")]
    top_k: u32,
    #[serde(rename = "topP")]
    top_p: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiResponseContent,
}

#[derive(Deserialize)]
struct GeminiResponseContent {
    parts: Vec<GeminiPart>,
}

impl GeminiProvider {
    pub fn new(api_key: String, client: reqwest::Client) -> Self {
        Self { api_key, client }
    }

    async fn generate(
        &self,
        contents: Vec<GeminiContent>,
        opts: &GenerationOptions,
    ) -> Result<String, AppError> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{MODEL}:generateContent?key={}",
            self.api_key
        );

        let body = GeminiRequest {
            contents,
            generation_config: GeminiGenerationConfig {
                temperature: opts.temperature,
                top_k: 40,
                top_p: 0.95,
                max_output_tokens: opts.max_tokens,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::provider(NAME, e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::provider(NAME, format!("{status}: {error_text}")));
        }

        let parsed: GeminiResponse = response
            .json()
            .await
            .map_err(|e| AppError::provider(NAME, format!("malformed response: {e}")))?;

        parsed
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .ok_or_else(|| AppError::provider(NAME, "empty candidates in response"))
    }
}

#[async_trait]
impl GenerativeProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn complete(&self, prompt: &str, opts: &GenerationOptions) -> Result<String, AppError> {
        let contents = vec![GeminiContent {
            role: "user",
            parts: vec![GeminiPart {
                text: prompt.to_string(),
            }],
        }];
        self.generate(contents, opts).await
    }

    async fn chat(&self, turns: &[ChatTurn], opts: &GenerationOptions) -> Result<String, AppError> {
        // Gemini only accepts user/model roles; system turns are folded in as
        // user content so the instruction is not lost.
        let contents = turns
            .iter()
            .map(|turn| GeminiContent {
                role: match turn.role {
                    ChatRole::Assistant => "model",
                    ChatRole::User | ChatRole::System => "user",
                },
                parts: vec![GeminiPart {
                    text: turn.content.clone(),
                }],
            })
            .collect();
        self.generate(contents, opts).await
    }
}
