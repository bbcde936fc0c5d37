//! Recovery of a JSON object from free-form generated text.
//!
//! Model output is treated as hostile input: it may wrap the object in prose
//! or markdown fences, stop halfway through, or contain braces inside string
//! values. The extractor takes the *first* balanced top-level object and
//! ignores everything around it.

use serde_json::{Map, Value as JsonValue};

/// Returned whenever no usable object can be recovered.
pub const EMPTY_OBJECT: &str = "{}";

/// Outcome of locating an object in generated text.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// A balanced candidate that parsed as a JSON object.
    Object(Map<String, JsonValue>),

    /// A balanced candidate was found but is not valid JSON.
    Malformed { candidate: String, reason: String },

    /// No `{`, or the braces never balanced.
    NotFound,
}

/// Extract a single JSON object from `text`.
///
/// The returned string always parses as JSON: either the first balanced
/// object in `text`, verbatim, or [`EMPTY_OBJECT`].
pub fn extract_json_object(text: &str) -> String {
    match balanced_candidate(text) {
        Some(candidate) if serde_json::from_str::<JsonValue>(&candidate).is_ok() => candidate,
        _ => EMPTY_OBJECT.to_string(),
    }
}

/// Locate and parse the first balanced object in `text`.
///
/// Unlike [`extract_json_object`], a malformed candidate is reported rather
/// than collapsed into the empty object, so callers can fall back.
pub fn locate_json_object(text: &str) -> Extraction {
    let Some(candidate) = balanced_candidate(text) else {
        return Extraction::NotFound;
    };

    match serde_json::from_str::<Map<String, JsonValue>>(&candidate) {
        Ok(object) => Extraction::Object(object),
        Err(e) => Extraction::Malformed {
            candidate,
            reason: e.to_string(),
        },
    }
}

/// Strip code fences, then return the first brace-balanced `{...}` span.
fn balanced_candidate(text: &str) -> Option<String> {
    let cleaned = strip_fences(text);
    let start = cleaned.find('{')?;

    let mut depth: usize = 0;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in cleaned[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset + c.len_utf8();
                    return Some(cleaned[start..end].to_string());
                }
            }
            _ => {}
        }
    }

    None
}

fn strip_fences(text: &str) -> String {
    text.trim().replace("```json", "```").replace("```", "")
}

/// JSON "falsy" values: `null`, `false`, `0`, `""`, `[]` and `{}`.
pub fn is_empty_value(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => true,
        JsonValue::Bool(b) => !b,
        JsonValue::Number(n) => n.as_f64() == Some(0.0),
        JsonValue::String(s) => s.is_empty(),
        JsonValue::Array(a) => a.is_empty(),
        JsonValue::Object(o) => o.is_empty(),
    }
}
