/*!
 * Extraction of JSON objects from model output.
 *
 * Models asked for "strict JSON" still sometimes wrap the object in a Markdown
 * code fence or add a sentence around it. The helpers here locate the object
 * so that the stages can hand it to serde.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;

static FENCED_OBJECT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```[A-Za-z]*\s*(\{.*?\})\s*```").expect("valid fenced JSON regex")
});

/// Locate the JSON object in a model reply
///
/// Tries, in order: the whole trimmed text, the content of a code fence, and
/// the span from the first `{` to the last `}`.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        return Some(trimmed);
    }

    // First fenced block holding valid JSON wins; later blocks are alternatives
    let mut fenced = FENCED_OBJECT
        .captures_iter(trimmed)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .peekable();
    if let Some(first) = fenced.peek().copied() {
        return Some(
            fenced
                .find(|candidate| serde_json::from_str::<serde_json::Value>(candidate).is_ok())
                .unwrap_or(first),
        );
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    (end > start).then(|| &trimmed[start..=end])
}

/// Extract and deserialize a JSON object from a model reply
///
/// The error string describes what went wrong and is meant to be wrapped in a
/// stage-specific malformed-output error.
pub fn parse_json_object<T: DeserializeOwned>(text: &str) -> Result<T, String> {
    let object = extract_json_object(text).ok_or_else(|| "no JSON object found".to_string())?;
    serde_json::from_str(object).map_err(|e| e.to_string())
}

/// Shorten model output for log and error messages
pub fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}
