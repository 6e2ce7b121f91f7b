//! JSON payload extraction from raw model output.
//!
//! Models wrap JSON in code fences or surround it with prose. This module
//! cleans the text, locates the first balanced object and parses it.

use serde_json::{Map, Value};
use thiserror::Error;

/// Maximum accepted raw response length (100KB).
pub const MAX_RESPONSE_LENGTH: usize = 100_000;

/// Why a raw response could not be turned into a JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("response is empty")]
    Empty,

    #[error("response too long: {actual} bytes exceeds maximum of {max} bytes")]
    TooLong { max: usize, actual: usize },

    #[error("JSON parse error: {0}")]
    Parse(String),

    #[error("expected a JSON object")]
    NotAnObject,
}

/// Parses the first JSON object found in `raw`.
pub fn parse_object(raw: &str) -> Result<Map<String, Value>, PayloadError> {
    if raw.len() > MAX_RESPONSE_LENGTH {
        return Err(PayloadError::TooLong {
            max: MAX_RESPONSE_LENGTH,
            actual: raw.len(),
        });
    }

    let cleaned = remove_control_chars(raw);
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        return Err(PayloadError::Empty);
    }

    let candidate = locate_json(trimmed);
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(PayloadError::NotAnObject),
        Err(e) => Err(PayloadError::Parse(e.to_string())),
    }
}

fn remove_control_chars(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\t' | '\r'))
        .collect()
}

/// Picks the JSON text out of a response: fenced block first, then the
/// first balanced object, then the whole text.
fn locate_json(s: &str) -> &str {
    if let Some(fenced) = strip_code_fence(s) {
        return fenced;
    }
    if let Some(start) = s.find('{') {
        if let Some(object) = balanced_object(s, start) {
            return object;
        }
    }
    s
}

fn strip_code_fence(s: &str) -> Option<&str> {
    let start = s.find("```")?;
    let after_ticks = &s[start + 3..];
    let label_len = after_ticks
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(after_ticks.len());
    let label = &after_ticks[..label_len];
    if !(label.is_empty() || label.eq_ignore_ascii_case("json")) {
        return None;
    }
    let body = &after_ticks[label_len..];
    let end = body.find("```").unwrap_or(body.len());
    Some(body[..end].trim())
}

fn balanced_object(s: &str, start: usize) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, c) in s[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&s[start..start + i + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_object() {
        let map = parse_object(r#"{"missing_core_fields": []}"#).unwrap();
        assert!(map["missing_core_fields"].as_array().unwrap().is_empty());
    }

    #[test]
    fn strips_json_code_fence() {
        let raw = "```json\n{\"next_question_suggestion\": \"Where?\"}\n```";
        let map = parse_object(raw).unwrap();
        assert_eq!(map["next_question_suggestion"], "Where?");
    }

    #[test]
    fn strips_bare_code_fence() {
        let raw = "```\n{\"a\": 1}\n```";
        assert_eq!(parse_object(raw).unwrap()["a"], 1);
    }

    #[test]
    fn strips_single_line_code_fence() {
        for raw in [
            "```json {\"a\": 1}```",
            "```JSON\t{\"a\": 1} ```",
            "```{\"a\": 1}```",
        ] {
            assert_eq!(parse_object(raw).unwrap()["a"], 1, "input {:?}", raw);
        }
    }

    #[test]
    fn other_fence_languages_fall_back_to_the_object() {
        let raw = "```python\nx = 1\n``` then {\"a\": 2}";
        assert_eq!(parse_object(raw).unwrap()["a"], 2);
    }

    #[test]
    fn finds_object_inside_prose() {
        let raw = "Here is the analysis: {\"a\": {\"b\": \"}\"}} hope that helps";
        let map = parse_object(raw).unwrap();
        assert_eq!(map["a"]["b"], "}");
    }

    #[test]
    fn handles_multibyte_text_before_object() {
        let raw = "Résumé → {\"title\": \"Pothole on Oak Avenue\"}";
        assert_eq!(parse_object(raw).unwrap()["title"], "Pothole on Oak Avenue");
    }

    #[test]
    fn rejects_non_objects() {
        assert_eq!(parse_object("[1, 2]"), Err(PayloadError::NotAnObject));
        assert_eq!(parse_object("   "), Err(PayloadError::Empty));
        assert!(matches!(parse_object("not json"), Err(PayloadError::Parse(_))));
        assert!(matches!(parse_object("{\"a\": "), Err(PayloadError::Parse(_))));
    }

    #[test]
    fn rejects_oversized_responses() {
        let raw = "x".repeat(MAX_RESPONSE_LENGTH + 1);
        assert!(matches!(parse_object(&raw), Err(PayloadError::TooLong { .. })));
    }

    #[test]
    fn removes_control_characters() {
        let raw = "{\"a\":\u{0007} \"b\"}";
        assert_eq!(parse_object(raw).unwrap()["a"], "b");
    }
}
