//! Key-casing conversion for API payloads.
//!
//! The backend speaks snake_case; the typed models (and the original
//! dashboard views) expect camelCase. Responses are converted once,
//! right after parsing, so everything downstream sees one casing.

use serde_json::{Map, Value};

/// Recursively rewrite every snake_case object key in `value` to
/// camelCase.
///
/// Arrays are mapped element-wise, scalars pass through unchanged, and
/// keys that are already camelCase (no underscore followed by a
/// lowercase letter) are untouched, so the function is idempotent on
/// already-converted values. It never fails on any JSON-parseable
/// input.
pub fn keys_to_camel_case(value: Value) -> Value {
    match value {
        Value::Object(entries) => Value::Object(
            entries
                .into_iter()
                .map(|(key, nested)| (snake_to_camel(&key), keys_to_camel_case(nested)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(keys_to_camel_case).collect()),
        scalar => scalar,
    }
}

/// Convert one key: each `_` directly followed by an ASCII lowercase
/// letter is dropped and the letter uppercased. Any other underscore
/// (trailing, doubled, before a digit) is kept as-is.
fn snake_to_camel(key: &str) -> String {
    if !key.contains('_') {
        return key.to_string();
    }

    let mut converted = String::with_capacity(key.len());
    let mut chars = key.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '_' {
            match chars.peek() {
                Some(next) if next.is_ascii_lowercase() => {
                    converted.push(next.to_ascii_uppercase());
                    chars.next();
                }
                _ => converted.push('_'),
            }
        } else {
            converted.push(ch);
        }
    }
    converted
}
