use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const TEXT_MIN_CHARS: usize = 3;
pub const TEXT_MAX_CHARS: usize = 10_000;
pub const MAX_CHAT_MESSAGES: usize = 50;
pub const MAX_MESSAGE_CHARS: usize = 4_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Grammar,
    Paraphrase,
    Humanize,
    Aicheck,
    Chat,
}

impl Mode {
    pub fn is_text_mode(&self) -> bool {
        !matches!(self, Mode::Chat)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Grammar => "grammar",
            Mode::Paraphrase => "paraphrase",
            Mode::Humanize => "humanize",
            Mode::Aicheck => "aicheck",
            Mode::Chat => "chat",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    #[default]
    Standard,
    Formal,
    Casual,
    Academic,
    Creative,
    Concise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

/// Unified request body for `/api/ai/process`. Text modes use `text`/`style`;
/// chat mode uses `messages` (optionally streamed and persisted to a session).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiRequest {
    pub mode: Mode,
    pub text: Option<String>,
    pub style: Option<Style>,
    pub custom_tone: Option<String>,
    pub messages: Option<Vec<ChatTurn>>,
    #[serde(default)]
    pub stream: bool,
    pub session_id: Option<i64>,
}

/// Enforces the text length bounds before any provider is touched.
pub fn validate_text(text: Option<&str>) -> Result<String, crate::error::AppError> {
    let text = text
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| crate::error::AppError::validation("text", "text is required"))?;

    let chars = text.chars().count();
    if chars < TEXT_MIN_CHARS {
        return Err(crate::error::AppError::validation(
            "text",
            format!("text must be at least {TEXT_MIN_CHARS} characters"),
        ));
    }
    if chars > TEXT_MAX_CHARS {
        return Err(crate::error::AppError::validation(
            "text",
            format!("text must be at most {TEXT_MAX_CHARS} characters"),
        ));
    }
    Ok(text.to_string())
}

pub fn validate_messages(
    messages: Option<&[ChatTurn]>,
) -> Result<Vec<ChatTurn>, crate::error::AppError> {
    let messages = messages
        .filter(|m| !m.is_empty())
        .ok_or_else(|| {
            crate::error::AppError::validation("messages", "messages is required and must be non-empty")
        })?;

    if messages.len() > MAX_CHAT_MESSAGES {
        return Err(crate::error::AppError::validation(
            "messages",
            format!("at most {MAX_CHAT_MESSAGES} messages per request"),
        ));
    }
    for (i, turn) in messages.iter().enumerate() {
        let chars = turn.content.chars().count();
        if chars == 0 {
            return Err(crate::error::AppError::validation(
                "messages",
                format!("message {i} has empty content"),
            ));
        }
        if chars > MAX_MESSAGE_CHARS {
            return Err(crate::error::AppError::validation(
                "messages",
                format!("message {i} exceeds {MAX_MESSAGE_CHARS} characters"),
            ));
        }
    }
    Ok(messages.to_vec())
}

impl AiRequest {
    /// Validates the mode-specific invariants and returns the payload the
    /// dispatcher needs. Rejected requests must never reach a provider.
    pub fn validate(&self) -> Result<ValidatedRequest, crate::error::AppError> {
        if self.mode.is_text_mode() {
            let text = validate_text(self.text.as_deref())?;
            Ok(ValidatedRequest::Text {
                mode: self.mode,
                text,
                style: self.style.unwrap_or_default(),
                custom_tone: self.custom_tone.clone(),
            })
        } else {
            let messages = validate_messages(self.messages.as_deref())?;
            Ok(ValidatedRequest::Chat {
                messages,
                stream: self.stream,
                session_id: self.session_id,
            })
        }
    }
}

#[derive(Debug, Clone)]
pub enum ValidatedRequest {
    Text {
        mode: Mode,
        text: String,
        style: Style,
        custom_tone: Option<String>,
    },
    Chat {
        messages: Vec<ChatTurn>,
        stream: bool,
        session_id: Option<i64>,
    },
}

/// Four 0-100 scores attached to every tool result for UI display.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub correctness: u8,
    pub clarity: u8,
    pub engagement: u8,
    pub delivery: u8,
}

/// A flagged span of the submitted text. `start`/`end` are char offsets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    #[serde(rename = "type")]
    pub kind: String,
    pub start: usize,
    pub end: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
    pub replacement: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrammarResult {
    pub corrected: String,
    pub highlights: Vec<Highlight>,
    pub suggestions: Vec<Suggestion>,
    pub metrics: Metrics,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParaphraseResult {
    pub paraphrased: String,
    pub metrics: Metrics,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HumanizeResult {
    pub humanized: String,
    pub metrics: Metrics,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiCheckResult {
    pub ai_percentage: u8,
    pub highlights: Vec<Highlight>,
    pub suggestions: Vec<Suggestion>,
    pub metrics: Metrics,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_request(text: &str) -> AiRequest {
        AiRequest {
            mode: Mode::Grammar,
            text: Some(text.to_string()),
            style: None,
            custom_tone: None,
            messages: None,
            stream: false,
            session_id: None,
        }
    }

    #[test]
    fn text_length_boundaries() {
        assert!(validate_text(Some("ab")).is_err());
        assert!(validate_text(Some("abc")).is_ok());
        let max = "a".repeat(TEXT_MAX_CHARS);
        assert!(validate_text(Some(&max)).is_ok());
        let over = "a".repeat(TEXT_MAX_CHARS + 1);
        assert!(validate_text(Some(&over)).is_err());
    }

    #[test]
    fn text_required_for_text_modes() {
        let mut req = text_request("hello there");
        req.text = None;
        assert!(req.validate().is_err());
    }

    #[test]
    fn chat_requires_messages() {
        let req = AiRequest {
            mode: Mode::Chat,
            text: None,
            style: None,
            custom_tone: None,
            messages: Some(vec![]),
            stream: false,
            session_id: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn chat_message_limits() {
        let turn = ChatTurn {
            role: ChatRole::User,
            content: "hi".to_string(),
        };
        let too_many = vec![turn.clone(); MAX_CHAT_MESSAGES + 1];
        assert!(validate_messages(Some(&too_many)).is_err());

        let oversized = vec![ChatTurn {
            role: ChatRole::User,
            content: "x".repeat(MAX_MESSAGE_CHARS + 1),
        }];
        assert!(validate_messages(Some(&oversized)).is_err());

        assert!(validate_messages(Some(&[turn])).is_ok());
    }

    #[test]
    fn unknown_role_rejected_at_deserialization() {
        let raw = r#"{"role":"wizard","content":"hi"}"#;
        assert!(serde_json::from_str::<ChatTurn>(raw).is_err());
    }

    #[test]
    fn mode_parses_lowercase() {
        let mode: Mode = serde_json::from_str("\"aicheck\"").unwrap();
        assert_eq!(mode, Mode::Aicheck);
        assert!(serde_json::from_str::<Mode>("\"translate\"").is_err());
    }
}
