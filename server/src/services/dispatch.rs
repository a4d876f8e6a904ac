//! Mode dispatcher: routes a validated request to the right capability with
//! ordered fallback. Each provider gets exactly one attempt; the mock
//! generator is the terminal fallback for every capability, so dispatch never
//! surfaces a provider error.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use uuid::Uuid;

use crate::log_warn;
use crate::providers::{extract_json_object, GenerationOptions, ProviderRegistry};
use crate::services::{prompts, rules, scoring};
use crate::types::{
    AiCheckResult, ChatTurn, GrammarResult, Highlight, HumanizeResult, ParaphraseResult, Style,
    Suggestion,
};

#[derive(Clone)]
pub struct DispatchService {
    registry: Arc<ProviderRegistry>,
}

impl DispatchService {
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    /// Grammar pipeline: local rule scan, merged with LanguageTool when
    /// configured; a generative JSON check backs up a failed or empty primary
    /// pass; the mock result is terminal when every source fails.
    pub async fn grammar(&self, text: &str, language: &str) -> GrammarResult {
        let local = rules::scan(text);
        let mut highlights = local.highlights;
        let mut suggestions = local.suggestions;
        let mut corrected = local.corrected;
        let mut primary_failed = false;

        if let Some(provider) = self.registry.grammar() {
            match provider.check(text, language).await {
                Ok(remote) => {
                    if !remote.corrected.is_empty() {
                        corrected = remote.corrected;
                    }
                    merge_spans(&mut highlights, remote.highlights);
                    suggestions.extend(remote.suggestions);
                }
                Err(e) => {
                    log_warn!("writeflow.dispatch", "grammar provider failed: {e}");
                    primary_failed = true;
                }
            }
        }

        if primary_failed || highlights.is_empty() {
            match self.generative_grammar(text).await {
                Ok(Some((gen_corrected, gen_highlights, gen_suggestions))) => {
                    if !gen_corrected.is_empty() {
                        corrected = gen_corrected;
                    }
                    merge_spans(&mut highlights, gen_highlights);
                    suggestions.extend(gen_suggestions);
                }
                Ok(None) => {
                    // no generative provider configured
                    if primary_failed && highlights.is_empty() {
                        return self.registry.mock().grammar(text);
                    }
                }
                Err(e) => {
                    log_warn!("writeflow.dispatch", "generative grammar fallback failed: {e}");
                    if primary_failed && highlights.is_empty() {
                        return self.registry.mock().grammar(text);
                    }
                }
            }
        }

        let metrics = scoring::compute_metrics(text, highlights.len());
        GrammarResult {
            corrected,
            highlights,
            suggestions,
            metrics,
        }
    }

    pub async fn paraphrase(
        &self,
        text: &str,
        style: Style,
        custom_tone: Option<&str>,
    ) -> ParaphraseResult {
        let prompt = prompts::paraphrase_prompt(text, style, custom_tone);
        if let Some(rewritten) = self.first_completion(&prompt).await {
            let metrics = scoring::compute_metrics(&rewritten, 0);
            return ParaphraseResult {
                paraphrased: rewritten,
                metrics,
            };
        }
        self.registry.mock().paraphrase(text, style, custom_tone)
    }

    pub async fn humanize(
        &self,
        text: &str,
        style: Style,
        custom_tone: Option<&str>,
    ) -> HumanizeResult {
        let prompt = prompts::humanize_prompt(text, style, custom_tone);
        if let Some(rewritten) = self.first_completion(&prompt).await {
            let metrics = scoring::compute_metrics(&rewritten, 0);
            return HumanizeResult {
                humanized: rewritten,
                metrics,
            };
        }
        self.registry.mock().humanize(text, style, custom_tone)
    }

    /// Detection: dedicated detector first, then the generative self-report
    /// heuristic, mock last.
    pub async fn ai_check(&self, text: &str) -> AiCheckResult {
        if let Some(detector) = self.registry.detector() {
            match detector.detect(text).await {
                Ok(result) => return result,
                Err(e) => {
                    log_warn!("writeflow.dispatch", "detector failed: {e}");
                }
            }
        }

        let prompt = prompts::ai_check_prompt(text);
        for provider in self.registry.generative_chain() {
            match provider.complete(&prompt, &GenerationOptions::strict()).await {
                Ok(raw) => {
                    if let Some(result) = parse_self_report(&raw, text) {
                        return result;
                    }
                    log_warn!(
                        "writeflow.dispatch",
                        "unparseable self-report from {}",
                        provider.name()
                    );
                }
                Err(e) => {
                    log_warn!("writeflow.dispatch", "self-report via {} failed: {e}", provider.name());
                }
            }
        }

        self.registry.mock().ai_check(text)
    }

    /// Chat: full history to the first generative provider that answers,
    /// walking the chain on error, canned mock reply last.
    pub async fn chat(&self, turns: &[ChatTurn]) -> String {
        let opts = GenerationOptions::default();
        for provider in self.registry.generative_chain() {
            match provider.chat(turns, &opts).await {
                Ok(reply) if !reply.trim().is_empty() => return reply,
                Ok(_) => {
                    log_warn!("writeflow.dispatch", "empty chat reply from {}", provider.name());
                }
                Err(e) => {
                    log_warn!("writeflow.dispatch", "chat via {} failed: {e}", provider.name());
                }
            }
        }
        self.registry.mock().chat_reply(turns)
    }

    /// Re-chunks a completed reply word-by-word through an mpsc channel. The
    /// provider clients are single-shot; streaming is presentation only.
    pub fn stream_reply(reply: String) -> ReceiverStream<String> {
        let (tx, rx) = mpsc::channel::<String>(64);
        tokio::spawn(async move {
            for chunk in reply.split_inclusive(' ') {
                // A failed send means the client went away; stop quietly.
                if tx.send(chunk.to_string()).await.is_err() {
                    break;
                }
            }
        });
        ReceiverStream::new(rx)
    }

    async fn first_completion(&self, prompt: &str) -> Option<String> {
        let opts = GenerationOptions::default();
        for provider in self.registry.generative_chain() {
            match provider.complete(prompt, &opts).await {
                Ok(reply) => {
                    let cleaned = clean_rewrite(&reply);
                    if !cleaned.is_empty() {
                        return Some(cleaned);
                    }
                    log_warn!("writeflow.dispatch", "empty completion from {}", provider.name());
                }
                Err(e) => {
                    log_warn!("writeflow.dispatch", "completion via {} failed: {e}", provider.name());
                }
            }
        }
        None
    }

    /// Asks the chain for a strict-JSON grammar check. A malformed reply is
    /// treated as an empty result of the correct shape, not an error.
    async fn generative_grammar(
        &self,
        text: &str,
    ) -> Result<Option<(String, Vec<Highlight>, Vec<Suggestion>)>, crate::error::AppError> {
        if self.registry.generative_chain().is_empty() {
            return Ok(None);
        }

        let prompt = prompts::grammar_prompt(text);
        let mut last_error = None;
        for provider in self.registry.generative_chain() {
            match provider.complete(&prompt, &GenerationOptions::strict()).await {
                Ok(raw) => {
                    return Ok(Some(parse_grammar_reply(&raw, text)));
                }
                Err(e) => {
                    log_warn!(
                        "writeflow.dispatch",
                        "grammar check via {} failed: {e}",
                        provider.name()
                    );
                    last_error = Some(e);
                }
            }
        }
        match last_error {
            Some(e) => Err(e),
            None => Ok(None),
        }
    }
}

/// Merge flagged spans, deduplicating by (start, end).
fn merge_spans(into: &mut Vec<Highlight>, from: Vec<Highlight>) {
    for candidate in from {
        let duplicate = into
            .iter()
            .any(|h| h.start == candidate.start && h.end == candidate.end);
        if !duplicate {
            into.push(candidate);
        }
    }
    into.sort_by_key(|h| (h.start, h.end));
}

fn parse_grammar_reply(raw: &str, original: &str) -> (String, Vec<Highlight>, Vec<Suggestion>) {
    let Some(json) = extract_json_object(raw) else {
        return (String::new(), Vec::new(), Vec::new());
    };
    let Ok(value) = serde_json::from_str::<Value>(json) else {
        return (String::new(), Vec::new(), Vec::new());
    };

    let corrected = value
        .get("corrected")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let mut highlights = Vec::new();
    let mut suggestions = Vec::new();
    if let Some(issues) = value.get("issues").and_then(Value::as_array) {
        for issue in issues {
            let kind = issue
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or("grammar")
                .to_string();
            let Some(flagged) = issue.get("text").and_then(Value::as_str) else {
                continue;
            };
            let replacement = issue
                .get("replacement")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            let description = issue
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or("Flagged by grammar check")
                .to_string();

            let span = original.find(flagged).map(|byte_start| {
                let start = original[..byte_start].chars().count();
                (start, start + flagged.chars().count())
            });

            if let Some((start, end)) = span {
                highlights.push(Highlight {
                    kind: kind.clone(),
                    start,
                    end,
                    suggestion: (!replacement.is_empty()).then(|| replacement.clone()),
                    message: Some(description.clone()),
                });
            }
            suggestions.push(Suggestion {
                id: Uuid::new_v4(),
                kind,
                text: flagged.to_string(),
                replacement,
                description,
            });
        }
    }

    (corrected, highlights, suggestions)
}

fn parse_self_report(raw: &str, text: &str) -> Option<AiCheckResult> {
    let json = extract_json_object(raw)?;
    let value: Value = serde_json::from_str(json).ok()?;
    let percentage = value.get("aiPercentage").and_then(Value::as_f64)?;

    let mut highlights = rules::ai_phrase_hits(text);
    if let Some(phrases) = value.get("phrases").and_then(Value::as_array) {
        let reported: Vec<Highlight> = phrases
            .iter()
            .filter_map(Value::as_str)
            .filter_map(|phrase| locate_phrase(text, phrase))
            .collect();
        merge_spans(&mut highlights, reported);
    }

    Some(AiCheckResult {
        ai_percentage: scoring::clamp_score(percentage),
        highlights,
        suggestions: Vec::new(),
        metrics: scoring::compute_metrics(text, 0),
    })
}

fn locate_phrase(text: &str, phrase: &str) -> Option<Highlight> {
    let needle = phrase.trim();
    if needle.is_empty() {
        return None;
    }
    let byte_start = text.find(needle)?;
    let start = text[..byte_start].chars().count();
    Some(Highlight {
        kind: "ai-phrase".to_string(),
        start,
        end: start + needle.chars().count(),
        suggestion: None,
        message: Some("Reads as machine-generated".to_string()),
    })
}

/// Models wrap rewrites in quotes or label lines despite instructions.
fn clean_rewrite(raw: &str) -> String {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix("```")
        .and_then(|rest| rest.split_once('\n').map(|(_, body)| body))
        .unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix("```").unwrap_or(trimmed).trim();
    let trimmed = trimmed
        .strip_prefix('"')
        .and_then(|r| r.strip_suffix('"'))
        .unwrap_or(trimmed);
    trimmed.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_deduplicates_by_span() {
        let mut base = vec![Highlight {
            kind: "grammar".to_string(),
            start: 0,
            end: 5,
            suggestion: None,
            message: None,
        }];
        merge_spans(
            &mut base,
            vec![
                Highlight {
                    kind: "style".to_string(),
                    start: 0,
                    end: 5,
                    suggestion: None,
                    message: None,
                },
                Highlight {
                    kind: "spelling".to_string(),
                    start: 7,
                    end: 10,
                    suggestion: None,
                    message: None,
                },
            ],
        );
        assert_eq!(base.len(), 2);
    }

    #[test]
    fn grammar_reply_parsed_with_spans() {
        let raw = r#"Sure! ```json
{"corrected": "He goes home.", "issues": [{"type": "grammar", "text": "He go", "replacement": "He goes", "description": "agreement"}]}
```"#;
        let (corrected, highlights, suggestions) = parse_grammar_reply(raw, "He go home.");
        assert_eq!(corrected, "He goes home.");
        assert_eq!(highlights.len(), 1);
        assert_eq!(highlights[0].start, 0);
        assert_eq!(highlights[0].end, 5);
        assert_eq!(suggestions[0].replacement, "He goes");
    }

    #[test]
    fn malformed_grammar_reply_yields_empty_shape() {
        let (corrected, highlights, suggestions) =
            parse_grammar_reply("I cannot help with that.", "text");
        assert!(corrected.is_empty());
        assert!(highlights.is_empty());
        assert!(suggestions.is_empty());
    }

    #[test]
    fn self_report_clamped_to_bounds() {
        let result = parse_self_report(r#"{"aiPercentage": 250, "phrases": []}"#, "hi there").unwrap();
        assert_eq!(result.ai_percentage, 100);
    }

    #[test]
    fn rewrite_cleaning_strips_fences_and_quotes() {
        assert_eq!(clean_rewrite("```text\nHello there.\n```"), "Hello there.");
        assert_eq!(clean_rewrite("\"Hello there.\""), "Hello there.");
        assert_eq!(clean_rewrite("  plain  "), "plain");
    }
}
