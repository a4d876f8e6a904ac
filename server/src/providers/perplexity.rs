use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::providers::{GenerationOptions, GenerativeProvider};
use crate::types::{ChatRole, ChatTurn};

const NAME: &str = "perplexity";
const MODEL: &str = "llama-3.1-sonar-small-128k-online";
const URL: &str = "https://api.perplexity.ai/chat/completions";

pub struct PerplexityProvider {
    api_key: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ChatRequest {
    model: &'static str,
    messages: Vec<WireMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: WireMessage,
}

impl PerplexityProvider {
    pub fn new(api_key: String, client: reqwest::Client) -> Self {
        Self { api_key, client }
    }

    async fn send(
        &self,
        messages: Vec<WireMessage>,
        opts: &GenerationOptions,
    ) -> Result<String, AppError> {
        let body = ChatRequest {
            model: MODEL,
            messages,
            temperature: opts.temperature,
            max_tokens: opts.max_tokens,
        };

        let response = self
            .client
            .post(URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::provider(NAME, e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::provider(NAME, format!("{status}: {error_text}")));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::provider(NAME, format!("malformed response: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AppError::provider(NAME, "empty choices in response"))
    }
}

#[async_trait]
impl GenerativeProvider for PerplexityProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn complete(&self, prompt: &str, opts: &GenerationOptions) -> Result<String, AppError> {
        let messages = vec![WireMessage {
            role: "user".to_string(),
            content: prompt.to_string(),
        }];
        self.send(messages, opts).await
    }

    async fn chat(&self, turns: &[ChatTurn], opts: &GenerationOptions) -> Result<String, AppError> {
        let messages = turns
            .iter()
            .map(|turn| WireMessage {
                role: ChatRole::as_str(&turn.role).to_string(),
                content: turn.content.clone(),
            })
            .collect();
        self.send(messages, opts).await
    }
}
