//! The single consolidated pattern rule table. Both the grammar pipeline's
//! local pass and the mock generator consume this table; there are no other
//! rule sets in the codebase.

use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use crate::types::{Highlight, Suggestion};

pub struct GrammarRule {
    pub pattern: Regex,
    pub replacement: &'static str,
    pub kind: &'static str,
    pub message: &'static str,
}

macro_rules! rule {
    ($pattern:expr, $replacement:expr, $kind:expr, $message:expr) => {
        GrammarRule {
            pattern: Regex::new($pattern).expect("invalid grammar rule pattern"),
            replacement: $replacement,
            kind: $kind,
            message: $message,
        }
    };
}

static GRAMMAR_RULES: Lazy<Vec<GrammarRule>> = Lazy::new(|| {
    vec![
        rule!(
            r"\b([Hh]e|[Ss]he|[Ii]t)\s+go\b",
            "$1 goes",
            "grammar",
            "Subject-verb agreement: singular subjects take 'goes'"
        ),
        rule!(
            r"\b([Hh]e|[Ss]he|[Ii]t)\s+have\b",
            "$1 has",
            "grammar",
            "Subject-verb agreement: singular subjects take 'has'"
        ),
        rule!(
            r"\b([Hh]e|[Ss]he|[Ii]t)\s+do\b",
            "$1 does",
            "grammar",
            "Subject-verb agreement: singular subjects take 'does'"
        ),
        rule!(
            r"\b([Tt])heir is\b",
            "${1}here is",
            "grammar",
            "Confused word: 'their' should be 'there'"
        ),
        rule!(
            r"\b([Cc]ould|[Ww]ould|[Ss]hould) of\b",
            "$1 have",
            "grammar",
            "'of' should be 'have' after a modal verb"
        ),
        rule!(r"\b[Aa]lot\b", "a lot", "spelling", "'alot' is not a word"),
        rule!(r"\bteh\b", "the", "spelling", "Misspelling of 'the'"),
        rule!(r"\bTeh\b", "The", "spelling", "Misspelling of 'The'"),
        rule!(
            r"\brecieve\b",
            "receive",
            "spelling",
            "Misspelling: i before e except after c"
        ),
        rule!(
            r"\bdefinately\b",
            "definitely",
            "spelling",
            "Misspelling of 'definitely'"
        ),
        rule!(
            r"\bseperate\b",
            "separate",
            "spelling",
            "Misspelling of 'separate'"
        ),
        rule!(
            r"\bdont\b",
            "don't",
            "punctuation",
            "Missing apostrophe in contraction"
        ),
        rule!(
            r"\bcant\b",
            "can't",
            "punctuation",
            "Missing apostrophe in contraction"
        ),
        rule!(
            r"\bdoesnt\b",
            "doesn't",
            "punctuation",
            "Missing apostrophe in contraction"
        ),
        rule!(
            r"\bisnt\b",
            "isn't",
            "punctuation",
            "Missing apostrophe in contraction"
        ),
        rule!(
            r" {2,}",
            " ",
            "spacing",
            "Multiple consecutive spaces"
        ),
    ]
});

/// Phrases that read as machine-generated tells; consumed by the detection
/// fallbacks and the mock humanizer.
pub static AI_PHRASES: &[&str] = &[
    "delve into",
    "delve",
    "furthermore",
    "moreover",
    "in conclusion",
    "it is important to note",
    "it's worth noting",
    "in today's fast-paced world",
    "navigate the complexities",
    "in the realm of",
    "a testament to",
    "rich tapestry",
    "leverage",
    "utilize",
    "dive deep",
];

pub fn rules() -> &'static [GrammarRule] {
    &GRAMMAR_RULES
}

#[derive(Debug, Clone)]
pub struct RuleScan {
    pub highlights: Vec<Highlight>,
    pub suggestions: Vec<Suggestion>,
    pub corrected: String,
}

/// One pass over the rule table: flagged spans (char offsets), one suggestion
/// per hit, and the text with every rule's replacement applied.
pub fn scan(text: &str) -> RuleScan {
    let mut highlights = Vec::new();
    let mut suggestions = Vec::new();

    for rule in rules() {
        for m in rule.pattern.find_iter(text) {
            let start = text[..m.start()].chars().count();
            let end = start + m.as_str().chars().count();
            let replacement = rule
                .pattern
                .replace(m.as_str(), rule.replacement)
                .into_owned();

            highlights.push(Highlight {
                kind: rule.kind.to_string(),
                start,
                end,
                suggestion: Some(replacement.clone()),
                message: Some(rule.message.to_string()),
            });
            suggestions.push(Suggestion {
                id: Uuid::new_v4(),
                kind: rule.kind.to_string(),
                text: m.as_str().to_string(),
                replacement,
                description: rule.message.to_string(),
            });
        }
    }

    for (start, end, word) in repeated_word_spans(text) {
        highlights.push(Highlight {
            kind: "repetition".to_string(),
            start,
            end,
            suggestion: Some(word.clone()),
            message: Some("Repeated word".to_string()),
        });
        suggestions.push(Suggestion {
            id: Uuid::new_v4(),
            kind: "repetition".to_string(),
            text: format!("{word} {word}"),
            replacement: word,
            description: "Repeated word".to_string(),
        });
    }

    let mut corrected = text.to_string();
    for rule in rules() {
        corrected = rule
            .pattern
            .replace_all(&corrected, rule.replacement)
            .into_owned();
    }
    let corrected = collapse_repeated_words(&corrected);

    RuleScan {
        highlights,
        suggestions,
        corrected,
    }
}

/// Char-offset spans of AI-tell phrase hits in `text`, case-insensitive.
pub fn ai_phrase_hits(text: &str) -> Vec<Highlight> {
    let lower = text.to_lowercase();
    let mut hits: Vec<Highlight> = Vec::new();

    for phrase in AI_PHRASES {
        let mut search_from = 0usize;
        while let Some(found) = lower[search_from..].find(phrase) {
            let byte_start = search_from + found;
            let start = lower[..byte_start].chars().count();
            let end = start + phrase.chars().count();
            // "delve" inside an already-matched "delve into" is not a new hit
            let overlaps = hits.iter().any(|h| start >= h.start && end <= h.end);
            if !overlaps {
                hits.push(Highlight {
                    kind: "ai-phrase".to_string(),
                    start,
                    end,
                    suggestion: None,
                    message: Some(format!("'{phrase}' is a common AI phrasing")),
                });
            }
            search_from = byte_start + phrase.len();
        }
    }

    hits.sort_by_key(|h| h.start);
    hits
}

// The regex crate has no backreferences, so doubled words get a manual pass.
fn repeated_word_spans(text: &str) -> Vec<(usize, usize, String)> {
    let mut spans = Vec::new();
    let mut prev: Option<(usize, &str)> = None;
    let mut char_offset = 0usize;

    for token in text.split_inclusive(char::is_whitespace) {
        let word = token.trim_end_matches(char::is_whitespace);
        if !word.is_empty() && word.chars().all(char::is_alphabetic) {
            if let Some((prev_start, prev_word)) = prev {
                if prev_word.eq_ignore_ascii_case(word) {
                    let end = char_offset + word.chars().count();
                    spans.push((prev_start, end, prev_word.to_string()));
                }
            }
            prev = Some((char_offset, word));
        } else if !word.is_empty() {
            prev = None;
        }
        char_offset += token.chars().count();
    }

    spans
}

fn collapse_repeated_words(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_word: Option<String> = None;

    for token in text.split_inclusive(char::is_whitespace) {
        let word = token.trim_end_matches(char::is_whitespace);
        let plain = !word.is_empty() && word.chars().all(char::is_alphabetic);
        let is_repeat = plain
            && prev_word
                .as_deref()
                .is_some_and(|p| p.eq_ignore_ascii_case(word));

        if !is_repeat {
            out.push_str(token);
        }
        if !word.is_empty() {
            prev_word = plain.then(|| word.to_string());
        }
    }

    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agreement_rule_hits_with_correct_span() {
        let scan = scan("He go to school.");
        assert!(scan.corrected.starts_with("He goes"));
        let hit = scan
            .highlights
            .iter()
            .find(|h| h.kind == "grammar")
            .expect("agreement highlight");
        assert_eq!(hit.start, 0);
        assert_eq!(hit.end, 5);
        assert_eq!(hit.suggestion.as_deref(), Some("He goes"));
    }

    #[test]
    fn misspellings_and_contractions() {
        let scan = scan("I dont like teh rain alot.");
        assert_eq!(scan.corrected, "I don't like the rain a lot.");
        assert_eq!(scan.suggestions.len(), 3);
    }

    #[test]
    fn repeated_word_detected_and_collapsed() {
        let scan = scan("This is is fine.");
        assert!(scan.highlights.iter().any(|h| h.kind == "repetition"));
        assert_eq!(scan.corrected, "This is fine.");
    }

    #[test]
    fn clean_text_yields_no_hits() {
        let scan = scan("The quick brown fox jumps over a lazy dog.");
        assert!(scan.highlights.is_empty());
        assert_eq!(scan.corrected, "The quick brown fox jumps over a lazy dog.");
    }

    #[test]
    fn ai_phrases_found_case_insensitively() {
        let hits = ai_phrase_hits("Furthermore, we must delve into the details.");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].start, 0);
        assert_eq!(hits[0].end, "furthermore".chars().count());
    }

    #[test]
    fn nested_phrase_not_double_counted() {
        let hits = ai_phrase_hits("Let us delve into this.");
        assert_eq!(hits.len(), 1);
    }
}
