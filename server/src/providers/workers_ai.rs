use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::providers::{GenerationOptions, GenerativeProvider};
use crate::types::{ChatRole, ChatTurn};

const NAME: &str = "workers-ai";
const MODEL: &str = "@cf/meta/llama-3-8b-instruct";

pub struct WorkersAiProvider {
    account_id: String,
    api_token: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct RunRequest {
    messages: Vec<WireMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct RunResponse {
    result: Option<RunResult>,
    success: bool,
}

#[derive(Deserialize)]
struct RunResult {
    response: Option<String>,
}

impl WorkersAiProvider {
    pub fn new(account_id: String, api_token: String, client: reqwest::Client) -> Self {
        Self {
            account_id,
            api_token,
            client,
        }
    }

    async fn run(
        &self,
        messages: Vec<WireMessage>,
        opts: &GenerationOptions,
    ) -> Result<String, AppError> {
        let url = format!(
            "https://api.cloudflare.com/client/v4/accounts/{}/ai/run/{MODEL}",
            self.account_id
        );

        let body = RunRequest {
            messages,
            temperature: opts.temperature,
            max_tokens: opts.max_tokens,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::provider(NAME, e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::provider(NAME, format!("{status}: {error_text}")));
        }

        let parsed: RunResponse = response
            .json()
            .await
            .map_err(|e| AppError::provider(NAME, format!("malformed response: {e}")))?;

        if !parsed.success {
            return Err(AppError::provider(NAME, "run reported success=false"));
        }

        parsed
            .result
            .and_then(|r| r.response)
            .ok_or_else(|| AppError::provider(NAME, "missing result.response"))
    }
}

#[async_trait]
impl GenerativeProvider for WorkersAiProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn complete(&self, prompt: &str, opts: &GenerationOptions) -> Result<String, AppError> {
        let messages = vec![WireMessage {
            role: "user".to_string(),
            content: prompt.to_string(),
        }];
        self.run(messages, opts).await
    }

    async fn chat(&self, turns: &[ChatTurn], opts: &GenerationOptions) -> Result<String, AppError> {
        let messages = turns
            .iter()
            .map(|turn| WireMessage {
                role: ChatRole::as_str(&turn.role).to_string(),
                content: turn.content.clone(),
            })
            .collect();
        self.run(messages, opts).await
    }
}
