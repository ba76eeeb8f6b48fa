//! Parses chat completion bodies and cleans up the generated text.

use super::{EnhancementError, LlmResult};
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
pub struct Choice {
    pub message: Option<ResponseMessage>,
}

#[derive(Deserialize, Debug)]
pub struct ResponseMessage {
    pub content: Option<String>,
}

/// Pulls `choices[0].message.content` out of a response body.
pub fn extract_content(body: &str) -> LlmResult<String> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| EnhancementError::Protocol(format!("response is not valid JSON: {}", e)))?;

    let raw = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .ok_or_else(|| {
            EnhancementError::Protocol("response has no choices[0].message.content".to_string())
        })?;

    let content = normalize(&raw);
    if content.is_empty() {
        return Err(EnhancementError::Protocol("response content is empty".to_string()));
    }
    Ok(content)
}

/// Strips the wrapping models like to add around a bare prompt:
/// code fences, a leading `Prompt:` style label and surrounding quotes.
pub fn normalize(raw: &str) -> String {
    let mut text = raw.trim().to_string();

    if let Ok(fence) = regex::Regex::new(r"(?s)^```[A-Za-z]*\s*(.*?)\s*```$") {
        if let Some(inner) = fence.captures(&text).and_then(|c| c.get(1)) {
            text = inner.as_str().to_string();
        }
    }

    if let Ok(label) =
        regex::Regex::new(r"(?i)^(?:improved |enhanced |positive |negative )?prompt\s*:\s*")
    {
        text = label.replace(&text, "").to_string();
    }

    let trimmed = text.trim();
    let unquoted = [('"', '"'), ('\u{201c}', '\u{201d}'), ('\'', '\'')]
        .iter()
        .find_map(|(open, close)| {
            trimmed
                .strip_prefix(*open)
                .and_then(|t| t.strip_suffix(*close))
        })
        .unwrap_or(trimmed);

    unquoted.trim().to_string()
}
