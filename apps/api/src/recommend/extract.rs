//! Response extraction — locates the JSON object inside free-form model
//! output and repairs the common failure mode (literal newlines inside
//! string values) before parsing.
//!
//! Extraction priority: a fence tagged `json` wins, then any fence, then the
//! outermost brace span. Each heuristic is a separate function with its own
//! tests so any of them can later be replaced by a stricter contract with
//! the model.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    /// The reply had text, but no JSON object could be located in it.
    #[error("AI response was not in valid JSON format")]
    NotJson,

    /// A candidate object was located but did not parse even after repair.
    #[error("Malformed AI response: {0}")]
    Malformed(#[source] serde_json::Error),
}

/// Returns the substring of `text` most likely to be a JSON object.
///
/// Priority order, first match wins:
/// 1. interior of a ```json fenced block
/// 2. interior of any ``` fenced block
/// 3. first `{` through last `}` inclusive
pub fn extract_json_object(text: &str) -> Option<&str> {
    if let Some(inner) = fenced_interior(text, "```json") {
        return Some(inner);
    }
    if let Some(inner) = fenced_interior(text, "```") {
        return Some(inner);
    }
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Interior of the first `open_fence`...``` block, trimmed. None when the
/// opening fence is absent or never closed.
fn fenced_interior<'a>(text: &'a str, open_fence: &str) -> Option<&'a str> {
    let after_open = text.find(open_fence)? + open_fence.len();
    let rest = &text[after_open..];
    let close = rest.find("```")?;
    Some(rest[..close].trim())
}

/// Collapses every run of CR/LF characters into a single space.
///
/// Models frequently emit literal newlines inside JSON string values despite
/// being told not to; flattening the candidate before parsing repairs that
/// case without touching anything else.
pub fn collapse_newlines(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_break = false;
    for c in s.chars() {
        if c == '\r' || c == '\n' {
            if !in_break {
                out.push(' ');
                in_break = true;
            }
        } else {
            out.push(c);
            in_break = false;
        }
    }
    out
}

/// Extracts, repairs, and parses the model's reply.
///
/// Exactly-empty text is not an error: the pipeline degrades to an empty
/// payload (zero matches, placeholder advice) rather than failing. Non-empty
/// text with no locatable JSON, and located-but-unparsable JSON, are two
/// distinct error conditions — "no content" is deliberately kept apart from
/// "garbled content".
pub fn parse_model_payload(text: &str) -> Result<Value, ExtractError> {
    if text.is_empty() {
        return Ok(Value::Object(serde_json::Map::new()));
    }

    let candidate = extract_json_object(text).ok_or(ExtractError::NotJson)?;
    let repaired = collapse_newlines(candidate);
    serde_json::from_str(&repaired).map_err(ExtractError::Malformed)
}
