//! Recursive key rewriting between the snake_case wire format and the
//! camelCase in-memory format.
//!
//! # Design
//! Conversion runs over `serde_json::Value`, before any typed decoding, so the
//! logic stays agnostic of the domain structs. Only object keys are rewritten;
//! values, array order and primitive leaves are carried over as-is. Both
//! functions build a new tree and never touch their input.
//!
//! Key rewriting is deliberately literal:
//! - snake → camel replaces every `_` directly followed by an ASCII lowercase
//!   letter with that letter uppercased.
//! - camel → snake replaces every ASCII uppercase letter with `_` plus its
//!   lowercase form.
//!
//! Keys with doubled underscores, leading underscores or digits next to a
//! boundary do not round-trip. That behavior is pinned by tests.

use serde_json::{Map, Value};

/// Rewrite a single snake_case key into camelCase.
pub fn snake_to_camel(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut chars = key.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '_' {
            if let Some(&next) = chars.peek() {
                if next.is_ascii_lowercase() {
                    out.push(next.to_ascii_uppercase());
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

/// Rewrite a single camelCase key into snake_case.
pub fn camel_to_snake(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Convert every object key in `value` from snake_case to camelCase.
pub fn to_camel_case(value: &Value) -> Value {
    rewrite_keys(value, snake_to_camel)
}

/// Convert every object key in `value` from camelCase to snake_case.
pub fn to_snake_case(value: &Value) -> Value {
    rewrite_keys(value, camel_to_snake)
}

fn rewrite_keys(value: &Value, rename: fn(&str) -> String) -> Value {
    match value {
        Value::Object(map) => {
            let mut converted = Map::with_capacity(map.len());
            for (key, inner) in map {
                converted.insert(rename(key), rewrite_keys(inner, rename));
            }
            Value::Object(converted)
        }
        Value::Array(items) => Value::Array(items.iter().map(|item| rewrite_keys(item, rename)).collect()),
        other => other.clone(),
    }
}
