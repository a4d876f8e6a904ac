use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::Config;
use crate::error::AppError;
use crate::types::{AiCheckResult, ChatTurn, GrammarResult};

pub mod gemini;
pub mod languagetool;
pub mod mock;
pub mod perplexity;
pub mod workers_ai;
pub mod zerogpt;

pub use mock::MockProvider;

#[derive(Debug, Clone, Copy)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 1024,
        }
    }
}

impl GenerationOptions {
    /// Lower temperature for structured-JSON replies.
    pub fn strict() -> Self {
        Self {
            temperature: 0.2,
            max_tokens: 1024,
        }
    }
}

/// A vendor that completes free-text prompts and chat histories.
/// Single attempt per call: no retry, no backoff, no response caching.
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn complete(&self, prompt: &str, opts: &GenerationOptions) -> Result<String, AppError>;

    async fn chat(&self, turns: &[ChatTurn], opts: &GenerationOptions) -> Result<String, AppError>;
}

/// A vendor that analyzes text for grammar issues.
#[async_trait]
pub trait GrammarProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn check(&self, text: &str, language: &str) -> Result<GrammarResult, AppError>;
}

/// A vendor that estimates how likely a text is machine-generated.
#[async_trait]
pub trait DetectionProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn detect(&self, text: &str) -> Result<AiCheckResult, AppError>;
}

/// Pulls the first balanced `{...}` object out of a reply that may wrap JSON
/// in code fences or prose. Vendors rarely honor "JSON only" instructions.
pub fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in raw[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&raw[start..start + i + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Frozen at startup from `Config`: the ordered generative fallback chain,
/// the optional grammar and detection vendors, and the always-present mock.
pub struct ProviderRegistry {
    generative: Vec<Arc<dyn GenerativeProvider>>,
    grammar: Option<Arc<dyn GrammarProvider>>,
    detector: Option<Arc<dyn DetectionProvider>>,
    mock: Arc<MockProvider>,
}

impl ProviderRegistry {
    pub fn new(
        generative: Vec<Arc<dyn GenerativeProvider>>,
        grammar: Option<Arc<dyn GrammarProvider>>,
        detector: Option<Arc<dyn DetectionProvider>>,
    ) -> Self {
        Self {
            generative,
            grammar,
            detector,
            mock: Arc::new(MockProvider::new()),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        let mut generative: Vec<Arc<dyn GenerativeProvider>> = Vec::new();
        if let Some(ref key) = config.gemini_api_key {
            generative.push(Arc::new(gemini::GeminiProvider::new(
                key.clone(),
                client.clone(),
            )));
        }
        if let Some(ref key) = config.perplexity_api_key {
            generative.push(Arc::new(perplexity::PerplexityProvider::new(
                key.clone(),
                client.clone(),
            )));
        }
        if let Some((account_id, token)) = config.cloudflare_credentials() {
            generative.push(Arc::new(workers_ai::WorkersAiProvider::new(
                account_id,
                token,
                client.clone(),
            )));
        }

        let grammar: Option<Arc<dyn GrammarProvider>> = config
            .languagetool_api_url
            .as_ref()
            .map(|base| {
                Arc::new(languagetool::LanguageToolProvider::new(
                    base.clone(),
                    client.clone(),
                )) as Arc<dyn GrammarProvider>
            });

        let detector: Option<Arc<dyn DetectionProvider>> =
            config.zerogpt_api_key.as_ref().map(|key| {
                Arc::new(zerogpt::ZeroGptProvider::new(key.clone(), client))
                    as Arc<dyn DetectionProvider>
            });

        Ok(Self::new(generative, grammar, detector))
    }

    pub fn generative_chain(&self) -> &[Arc<dyn GenerativeProvider>] {
        &self.generative
    }

    pub fn grammar(&self) -> Option<&Arc<dyn GrammarProvider>> {
        self.grammar.as_ref()
    }

    pub fn detector(&self) -> Option<&Arc<dyn DetectionProvider>> {
        self.detector.as_ref()
    }

    pub fn mock(&self) -> &Arc<MockProvider> {
        &self.mock
    }

    pub fn is_mock_only(&self) -> bool {
        self.generative.is_empty() && self.grammar.is_none() && self.detector.is_none()
    }

    /// Names of the configured live vendors, for /health.
    pub fn live_providers(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.generative.iter().map(|p| p.name()).collect();
        if let Some(ref g) = self.grammar {
            names.push(g.name());
        }
        if let Some(ref d) = self.detector {
            names.push(d.name());
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_bare_object() {
        let raw = r#"{"a": 1}"#;
        assert_eq!(extract_json_object(raw), Some(raw));
    }

    #[test]
    fn extracts_from_code_fence() {
        let raw = "Here you go:\n```json\n{\"corrected\": \"Hi.\"}\n```\nHope that helps!";
        assert_eq!(extract_json_object(raw), Some("{\"corrected\": \"Hi.\"}"));
    }

    #[test]
    fn handles_nested_braces_and_strings() {
        let raw = r#"prose {"a": {"b": "} tricky {"}, "c": 2} trailing"#;
        assert_eq!(
            extract_json_object(raw),
            Some(r#"{"a": {"b": "} tricky {"}, "c": 2}"#)
        );
    }

    #[test]
    fn returns_none_when_unbalanced() {
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object("{\"open\": true"), None);
    }
}
