//! No-network fallback for every capability. Always returns a well-formed
//! result and never errors; scores carry bounded random jitter, so tests
//! assert shape and bounds rather than exact values.

use async_trait::async_trait;
use rand::Rng;

use crate::error::AppError;
use crate::providers::{DetectionProvider, GenerationOptions, GenerativeProvider, GrammarProvider};
use crate::services::{rules, scoring};
use crate::types::{
    AiCheckResult, ChatRole, ChatTurn, GrammarResult, HumanizeResult, Metrics, ParaphraseResult,
    Style,
};

const NAME: &str = "mock";

static SYNONYM_SWAPS: &[(&str, &str)] = &[
    ("very ", "remarkably "),
    ("good ", "solid "),
    ("important ", "essential "),
    ("a lot of ", "plenty of "),
    ("help ", "assist "),
    ("show ", "demonstrate "),
    ("big ", "substantial "),
];

static HUMANIZE_SWAPS: &[(&str, &str)] = &[
    ("delve into", "look at"),
    ("furthermore", "also"),
    ("moreover", "besides that"),
    ("in conclusion", "overall"),
    ("it is important to note that", "note that"),
    ("leverage", "use"),
    ("utilize", "use"),
    ("do not", "don't"),
    ("cannot", "can't"),
    ("it is", "it's"),
];

pub struct MockProvider;

impl MockProvider {
    pub fn new() -> Self {
        Self
    }

    pub fn grammar(&self, text: &str) -> GrammarResult {
        let scan = rules::scan(text);
        let metrics = jitter(scoring::compute_metrics(text, scan.highlights.len()), 5);
        GrammarResult {
            corrected: scan.corrected,
            highlights: scan.highlights,
            suggestions: scan.suggestions,
            metrics,
        }
    }

    pub fn paraphrase(
        &self,
        text: &str,
        style: Style,
        _custom_tone: Option<&str>,
    ) -> ParaphraseResult {
        let mut rewritten = rules::scan(text).corrected;
        for (from, to) in SYNONYM_SWAPS {
            rewritten = case_insensitive_replace(&rewritten, from, to);
        }
        if style == Style::Concise {
            for filler in ["really ", "just ", "basically ", "actually "] {
                rewritten = case_insensitive_replace(&rewritten, filler, "");
            }
        }
        let metrics = jitter(scoring::compute_metrics(&rewritten, 0), 6);
        ParaphraseResult {
            paraphrased: rewritten,
            metrics,
        }
    }

    pub fn humanize(&self, text: &str, _style: Style, _custom_tone: Option<&str>) -> HumanizeResult {
        let mut rewritten = text.to_string();
        for (from, to) in HUMANIZE_SWAPS {
            rewritten = case_insensitive_replace(&rewritten, from, to);
        }
        let metrics = jitter(scoring::compute_metrics(&rewritten, 0), 6);
        HumanizeResult {
            humanized: rewritten,
            metrics,
        }
    }

    pub fn ai_check(&self, text: &str) -> AiCheckResult {
        let highlights = rules::ai_phrase_hits(text);
        let word_count = text.split_whitespace().count().max(1);
        let density = highlights.len() as f64 / (word_count as f64 / 25.0).max(1.0);
        let base = (density * 30.0).min(70.0);
        let noise = rand::thread_rng().gen_range(5.0..=20.0);
        let metrics = jitter(scoring::compute_metrics(text, highlights.len()), 5);

        AiCheckResult {
            ai_percentage: scoring::clamp_score(base + noise),
            highlights,
            suggestions: Vec::new(),
            metrics,
        }
    }

    pub fn chat_reply(&self, turns: &[ChatTurn]) -> String {
        let last_user = turns
            .iter()
            .rev()
            .find(|t| t.role == ChatRole::User)
            .map(|t| t.content.trim())
            .unwrap_or("");
        let snippet: String = last_user.chars().take(80).collect();

        let templates = [
            format!("That's a fair point about \"{snippet}\". Could you tell me more about what you're aiming for?"),
            format!("Thinking about \"{snippet}\" - a good next step is to sketch the outline before polishing the wording."),
            format!("On \"{snippet}\": try reading it aloud; awkward phrasing usually shows up immediately."),
        ];
        let pick = rand::thread_rng().gen_range(0..templates.len());
        templates[pick].clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerativeProvider for MockProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn complete(&self, prompt: &str, _opts: &GenerationOptions) -> Result<String, AppError> {
        let turn = ChatTurn {
            role: ChatRole::User,
            content: prompt.to_string(),
        };
        Ok(self.chat_reply(std::slice::from_ref(&turn)))
    }

    async fn chat(&self, turns: &[ChatTurn], _opts: &GenerationOptions) -> Result<String, AppError> {
        Ok(self.chat_reply(turns))
    }
}

#[async_trait]
impl GrammarProvider for MockProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn check(&self, text: &str, _language: &str) -> Result<GrammarResult, AppError> {
        Ok(self.grammar(text))
    }
}

#[async_trait]
impl DetectionProvider for MockProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn detect(&self, text: &str) -> Result<AiCheckResult, AppError> {
        Ok(self.ai_check(text))
    }
}

fn jitter(metrics: Metrics, spread: i16) -> Metrics {
    let mut rng = rand::thread_rng();
    let mut wobble = |value: u8| -> u8 {
        let delta = rng.gen_range(-spread..=spread);
        (value as i16 + delta).clamp(0, 100) as u8
    };
    Metrics {
        correctness: wobble(metrics.correctness),
        clarity: wobble(metrics.clarity),
        engagement: wobble(metrics.engagement),
        delivery: wobble(metrics.delivery),
    }
}

fn case_insensitive_replace(text: &str, from: &str, to: &str) -> String {
    let lower = text.to_lowercase();
    let from_lower = from.to_lowercase();
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0usize;

    while let Some(found) = lower[cursor..].find(&from_lower) {
        let at = cursor + found;
        out.push_str(&text[cursor..at]);
        out.push_str(to);
        cursor = at + from.len();
    }
    out.push_str(&text[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grammar_always_well_formed() {
        let result = MockProvider::new().grammar("He go to school.");
        assert!(!result.corrected.is_empty());
        assert!(!result.highlights.is_empty());
        assert!(result.metrics.correctness <= 100);
    }

    #[test]
    fn ai_check_bounds_hold_across_calls() {
        let mock = MockProvider::new();
        for _ in 0..20 {
            let result = mock.ai_check("Furthermore, we delve into the rich tapestry of text.");
            assert!(result.ai_percentage <= 100);
            assert!(!result.highlights.is_empty());
        }
    }

    #[test]
    fn chat_reply_mentions_last_user_message() {
        let turns = vec![ChatTurn {
            role: ChatRole::User,
            content: "help me write an intro".to_string(),
        }];
        let reply = MockProvider::new().chat_reply(&turns);
        assert!(reply.contains("help me write an intro"));
    }

    #[test]
    fn replace_is_case_insensitive() {
        assert_eq!(
            case_insensitive_replace("Furthermore, yes", "furthermore", "also"),
            "also, yes"
        );
    }
}
