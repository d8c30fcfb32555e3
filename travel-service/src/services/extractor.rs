//! Locate and parse the JSON payload embedded in a free-form model reply.
//!
//! Candidates are top-level balanced bracket spans found by a depth scanner
//! that skips brackets inside string literals. Spans nested in another
//! candidate are never tried on their own. The first candidate that parses
//! wins; the greedy first-open to last-close span is tried last.

use crate::error::TravelError;
use serde_json::Value;

/// Extract the first JSON array from `text`.
pub fn extract_json_array(text: &str) -> Result<Value, TravelError> {
    extract(text, '[', ']')
}

/// Extract the first JSON object from `text`.
pub fn extract_json_object(text: &str) -> Result<Value, TravelError> {
    extract(text, '{', '}')
}

fn extract(text: &str, open: char, close: char) -> Result<Value, TravelError> {
    let candidates = candidates(text, open, close);

    let mut first_failure: Option<(String, String)> = None;
    for candidate in &candidates {
        match serde_json::from_str::<Value>(candidate) {
            Ok(value) => return Ok(value),
            Err(e) => {
                if first_failure.is_none() {
                    first_failure = Some((candidate.to_string(), e.to_string()));
                }
            }
        }
    }

    match first_failure {
        Some((raw, reason)) => Err(TravelError::MalformedJson { raw, reason }),
        None => Err(TravelError::NoJsonFound),
    }
}

/// Top-level spans only: after a balanced span the scan resumes past its end,
/// and an opening bracket that never balances ends the scan.
fn candidates(text: &str, open: char, close: char) -> Vec<&str> {
    let mut out: Vec<&str> = Vec::new();
    let mut pos = 0;

    while let Some(rel) = text[pos..].find(open) {
        let start = pos + rel;
        match balanced_span(text, start) {
            Some(span) => {
                out.push(span);
                pos = start + span.len();
            }
            None => break,
        }
    }

    if let (Some(start), Some(end)) = (text.find(open), text.rfind(close)) {
        if start < end {
            let greedy = &text[start..end + close.len_utf8()];
            if !out.contains(&greedy) {
                out.push(greedy);
            }
        }
    }

    out
}

/// Span from the bracket at `start` to its matching close, if balanced.
fn balanced_span(text: &str, start: usize) -> Option<&str> {
    let mut stack: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => stack.push('}'),
            '[' => stack.push(']'),
            '}' | ']' => {
                if stack.pop() != Some(ch) {
                    return None;
                }
                if stack.is_empty() {
                    let end = start + offset + ch.len_utf8();
                    return Some(&text[start..end]);
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
    use serde_json::json;

    #[test]
    fn array_surrounded_by_prose() {
        let value = extract_json_array("Here you go:\n[1,2,3]\nEnjoy!").unwrap();
        assert_eq!(value, json!([1, 2, 3]));
    }

    #[test]
    fn object_inside_markdown_fence() {
        let text = "Sure!\n```json\n{\"a\": {\"b\": [1, 2]}}\n```\nHave fun.";
        assert_eq!(extract_json_object(text).unwrap(), json!({"a": {"b": [1, 2]}}));
    }

    #[test]
    fn no_brackets_is_no_json_found() {
        let err = extract_json_array("sorry, I can't help").unwrap_err();
        assert!(matches!(err, TravelError::NoJsonFound));
    }

    #[test]
    fn unclosed_bracket_is_no_json_found() {
        let err = extract_json_array("here it is: [1, 2, 3").unwrap_err();
        assert!(matches!(err, TravelError::NoJsonFound));
    }

    #[test]
    fn brackets_inside_strings_do_not_confuse_the_scanner() {
        let text = r#"result: [{"name": "Kyoto ]["}, {"name": "Nara \"[x]\""}] done"#;
        let value = extract_json_array(text).unwrap();
        assert_eq!(value[0]["name"], "Kyoto ][");
        assert_eq!(value[1]["name"], "Nara \"[x]\"");
    }

    #[test]
    fn skips_bracketed_prose_before_the_payload() {
        let text = "[note] the list follows: [{\"id\": \"1\"}]";
        let value = extract_json_array(text).unwrap();
        assert_eq!(value, json!([{"id": "1"}]));
    }

    #[test]
    fn balanced_but_invalid_is_malformed_json() {
        let err = extract_json_array("look: [1, 2,, 3] ok").unwrap_err();
        match err {
            TravelError::MalformedJson { raw, .. } => assert_eq!(raw, "[1, 2,, 3]"),
            other => panic!("expected malformed json, got {other:?}"),
        }
    }

    #[test]
    fn array_extraction_ignores_objects() {
        let err = extract_json_array("{\"a\": 1}").unwrap_err();
        assert!(matches!(err, TravelError::NoJsonFound));
    }

    #[test]
    fn truncated_object_is_malformed_not_an_inner_fragment() {
        let text = r#"{"attractions": ["WaterFire"], "accommodation": {"budget": "$80", "mid": "$150", "luxury": "$300"}, "food": {"budget": "$10"}, "bestTimeTo"#;
        let err = extract_json_object(text).unwrap_err();
        match err {
            TravelError::MalformedJson { raw, .. } => assert!(raw.starts_with("{\"attractions\"")),
            other => panic!("expected malformed json, got {other:?}"),
        }
    }

    #[test]
    fn invalid_outer_array_does_not_yield_nested_array() {
        let err = extract_json_array(r#"[{"name": "A", "tags": [1, 2]}, ]"#).unwrap_err();
        assert!(matches!(err, TravelError::MalformedJson { .. }));
    }
}
