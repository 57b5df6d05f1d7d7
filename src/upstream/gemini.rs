//! Gemini `generateContent` request and reply shapes.

use serde_json::{json, Value};

/// Only the most recent history entries are forwarded.
pub const HISTORY_LIMIT: usize = 6;

pub const NO_REPLY: &str = "Sorry, no reply returned";

/// Build the `generateContent` payload: trimmed history first, then the
/// current message, one text part per content item.
pub fn generate_content_payload(message: &str, history: Option<&Value>) -> Value {
    let mut contents: Vec<Value> = history
        .and_then(Value::as_array)
        .map(|entries| {
            let start = entries.len().saturating_sub(HISTORY_LIMIT);
            entries[start..].iter().filter_map(history_part).collect()
        })
        .unwrap_or_default();

    contents.push(json!({ "parts": [{ "text": message }] }));
    json!({ "contents": contents })
}

fn history_part(entry: &Value) -> Option<Value> {
    let entry = entry.as_object()?;
    let speaker = match entry.get("role").and_then(Value::as_str) {
        Some("user") => "User:",
        _ => "Assistant:",
    };
    let text = entry.get("text").and_then(Value::as_str).unwrap_or_default();
    Some(json!({ "parts": [{ "text": format!("{} {}", speaker, text) }] }))
}

/// Pull the first usable text out of a Gemini response. Empty strings fall
/// through to the next candidate location.
pub fn extract_reply(data: &Value) -> String {
    let candidate = data.pointer("/candidates/0");
    non_empty(candidate.and_then(|c| c.pointer("/content/parts/0/text")))
        .or_else(|| non_empty(candidate.and_then(|c| c.get("text"))))
        .or_else(|| non_empty(Some(data)))
        .unwrap_or(NO_REPLY)
        .to_string()
}

fn non_empty(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|text| !text.is_empty())
}
