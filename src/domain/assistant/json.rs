//! Extraction and strict decoding of JSON completion replies.
//!
//! Models often wrap JSON in a Markdown code fence or add a sentence around
//! it. The payload is cut out of the reply first, then decoded with serde so
//! that any missing required field fails the whole response.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::CompletionError;

/// Returns the JSON payload embedded in a completion reply.
pub fn extract_json(reply: &str) -> Result<&str, CompletionError> {
    let body = strip_code_fence(reply.trim());

    let start = body
        .find(|c| c == '{' || c == '[')
        .ok_or_else(|| CompletionError::invalid_response("reply contains no JSON"))?;
    let close = if body[start..].starts_with('{') { '}' } else { ']' };
    let end = body
        .rfind(close)
        .filter(|end| *end > start)
        .ok_or_else(|| CompletionError::invalid_response("reply contains unterminated JSON"))?;

    Ok(&body[start..=end])
}

fn strip_code_fence(text: &str) -> &str {
    let Some(after_open) = text.strip_prefix("```") else {
        return text;
    };
    // Skip the info string (e.g. "json") on the opening fence line.
    let after_info = after_open
        .find('\n')
        .map(|i| &after_open[i + 1..])
        .unwrap_or(after_open);
    match after_info.rfind("```") {
        Some(close) => after_info[..close].trim(),
        None => after_info.trim(),
    }
}

/// Decodes a list reply, accepting `{"<wrapper_key>": [...]}` or a bare array.
pub fn parse_list<T: DeserializeOwned>(
    reply: &str,
    wrapper_key: &str,
) -> Result<Vec<T>, CompletionError> {
    let payload = extract_json(reply)?;
    let value: Value = serde_json::from_str(payload)
        .map_err(|e| CompletionError::invalid_response(format!("malformed JSON: {}", e)))?;

    let list = match value {
        Value::Array(_) => value,
        Value::Object(mut map) => map.remove(wrapper_key).ok_or_else(|| {
            CompletionError::invalid_response(format!("missing field `{}`", wrapper_key))
        })?,
        _ => {
            return Err(CompletionError::invalid_response(
                "expected a JSON object or array",
            ))
        }
    };

    serde_json::from_value(list).map_err(|e| CompletionError::invalid_response(e.to_string()))
}

/// Decodes a single-object reply.
pub fn parse_object<T: DeserializeOwned>(reply: &str) -> Result<T, CompletionError> {
    let payload = extract_json(reply)?;
    serde_json::from_str(payload).map_err(|e| CompletionError::invalid_response(e.to_string()))
}

/// Fails when a required string field came back blank.
pub fn require_text(field: &str, value: &str) -> Result<(), CompletionError> {
    if value.trim().is_empty() {
        return Err(CompletionError::invalid_response(format!(
            "field `{}` is empty",
            field
        )));
    }
    Ok(())
}
