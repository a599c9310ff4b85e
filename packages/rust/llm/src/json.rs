//! Parsing JSON payloads out of model output.
//!
//! JSON mode usually yields a bare object, but some models still wrap it in a
//! Markdown code fence or add a sentence around it. This module recovers the
//! object in those cases and nothing more.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// Matches a fenced block: ```json ... ``` (language tag optional).
static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[A-Za-z0-9_-]*\s*\n?(.*?)\n?\s*```").expect("fence regex")
});

/// Parse model output as a JSON value.
///
/// Tries, in order: the whole text, the contents of the first code fence, and
/// the span from the first `{` to the last `}`. Returns the error of the
/// whole-text attempt when none succeeds.
pub fn parse_json_payload(text: &str) -> Result<Value, serde_json::Error> {
    let trimmed = text.trim();
    let direct = serde_json::from_str::<Value>(trimmed);
    if direct.is_ok() {
        return direct;
    }

    if let Some(inner) = FENCE_RE.captures(trimmed).and_then(|c| c.get(1)) {
        if let Ok(value) = serde_json::from_str::<Value>(inner.as_str().trim()) {
            return Ok(value);
        }
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            if let Ok(value) = serde_json::from_str::<Value>(&trimmed[start..=end]) {
                return Ok(value);
            }
        }
    }

    direct
}
