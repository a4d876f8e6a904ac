//! Per-mode prompt builders for the generative providers. Prompts that expect
//! structured replies spell out the exact JSON shape; the dispatcher still
//! unwraps fenced or prose-wrapped objects.

use crate::types::Style;

pub fn style_instruction(style: Style, custom_tone: Option<&str>) -> String {
    if let Some(tone) = custom_tone.map(str::trim).filter(|t| !t.is_empty()) {
        return format!("Write in this tone: {tone}.");
    }
    match style {
        Style::Standard => "Keep a natural, neutral tone.".to_string(),
        Style::Formal => "Use a formal, professional tone.".to_string(),
        Style::Casual => "Use a relaxed, conversational tone.".to_string(),
        Style::Academic => "Use precise academic language with measured claims.".to_string(),
        Style::Creative => "Use vivid, expressive language.".to_string(),
        Style::Concise => "Be as brief as possible without losing meaning.".to_string(),
    }
}

pub fn grammar_prompt(text: &str) -> String {
    format!(
        "Check the following text for grammar, spelling, and punctuation problems.\n\
         \n\
         Text: \"{text}\"\n\
         \n\
         Respond with only a JSON object in this exact shape:\n\
         {{\n\
           \"corrected\": \"the full corrected text\",\n\
           \"issues\": [\n\
             {{\"type\": \"grammar\", \"text\": \"the flagged fragment\", \
             \"replacement\": \"the fix\", \"description\": \"what is wrong\"}}\n\
           ]\n\
         }}\n\
         If the text is already correct, return it unchanged with an empty issues array."
    )
}

pub fn paraphrase_prompt(text: &str, style: Style, custom_tone: Option<&str>) -> String {
    format!(
        "Paraphrase the following text. {}\n\
         Preserve the meaning, change the wording and sentence structure.\n\
         Respond with only the paraphrased text, no preamble.\n\
         \n\
         Text: \"{text}\"",
        style_instruction(style, custom_tone)
    )
}

pub fn humanize_prompt(text: &str, style: Style, custom_tone: Option<&str>) -> String {
    format!(
        "Rewrite the following text so it reads as if written by a person. {}\n\
         Remove robotic phrasing, vary sentence length, prefer contractions and \
         plain words. Respond with only the rewritten text, no preamble.\n\
         \n\
         Text: \"{text}\"",
        style_instruction(style, custom_tone)
    )
}

pub fn ai_check_prompt(text: &str) -> String {
    format!(
        "Estimate the probability that the following text was written by an AI \
         language model.\n\
         \n\
         Text: \"{text}\"\n\
         \n\
         Respond with only a JSON object in this exact shape:\n\
         {{\"aiPercentage\": 0, \"phrases\": [\"any phrase that reads as machine-generated\"]}}\n\
         aiPercentage must be an integer from 0 to 100."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_tone_overrides_style() {
        let inst = style_instruction(Style::Formal, Some("pirate captain"));
        assert!(inst.contains("pirate captain"));
        assert!(!inst.contains("formal"));
    }

    #[test]
    fn blank_custom_tone_falls_back_to_style() {
        let inst = style_instruction(Style::Concise, Some("   "));
        assert!(inst.contains("brief"));
    }

    #[test]
    fn prompts_embed_the_text() {
        assert!(grammar_prompt("He go home.").contains("He go home."));
        assert!(ai_check_prompt("sample").contains("aiPercentage"));
    }
}
