//! Boundary adapter: flattens whatever the client sent as `input` into text.
//! The classifier itself only ever sees a string.

use serde_json::Value;

/// Normalizes a free-form JSON payload to text (untrimmed).
///
/// - `null` → empty
/// - string → itself
/// - object → its `text` field if present, else the first non-blank string
///   value in the order the client sent the keys, else the JSON rendering of
///   the first value, else empty
/// - anything else → its JSON rendering
pub fn normalize_input(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Object(mut map) => {
            if let Some(text) = map.remove("text") {
                return normalize_input(text);
            }
            if let Some(s) = map
                .values()
                .filter_map(Value::as_str)
                .find(|s| !s.trim().is_empty())
            {
                return s.to_string();
            }
            map.into_iter()
                .next()
                .map(|(_, v)| match v {
                    Value::String(s) => s,
                    other => other.to_string(),
                })
                .unwrap_or_default()
        }
        other => other.to_string(),
    }
}
