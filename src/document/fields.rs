//! Field accessors for loosely-typed match documents
//!
//! Two kinds of accessor live here:
//!
//! - **Structural** accessors (`object`, `array`, `string_list`) return an error
//!   when a block is present but has the wrong type. A structural error skips
//!   the whole document.
//! - **Leaf** accessors (`text`, `stringified`, `integer`, `number`, `flag`,
//!   `count`) are total: each declares its output type and default, and a
//!   missing or wrong-typed value resolves to that default.

use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};

/// Describe a JSON value's type for error messages
pub fn kind_of(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

/// Join a parent path and a key for error messages
pub fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

/// Present, non-null value for `key`
fn present<'a>(obj: &'a JsonObject, key: &str) -> Option<&'a JsonValue> {
    obj.get(key).filter(|v| !v.is_null())
}

// ============================================================================
// Structural accessors
// ============================================================================

/// Optional nested object. Absent or null yields `None`.
pub fn object<'a>(obj: &'a JsonObject, key: &str, parent: &str) -> Result<Option<&'a JsonObject>> {
    match present(obj, key) {
        None => Ok(None),
        Some(JsonValue::Object(inner)) => Ok(Some(inner)),
        Some(other) => Err(Error::wrong_type(
            join_path(parent, key),
            "an object",
            kind_of(other),
        )),
    }
}

/// Optional list. Absent or null yields an empty slice.
pub fn array<'a>(obj: &'a JsonObject, key: &str, parent: &str) -> Result<&'a [JsonValue]> {
    match present(obj, key) {
        None => Ok(&[]),
        Some(JsonValue::Array(items)) => Ok(items.as_slice()),
        Some(other) => Err(Error::wrong_type(
            join_path(parent, key),
            "an array",
            kind_of(other),
        )),
    }
}

/// Optional list of strings. Every element must be a string.
pub fn string_list(obj: &JsonObject, key: &str, parent: &str) -> Result<Vec<String>> {
    array(obj, key, parent)?
        .iter()
        .enumerate()
        .map(|(idx, item)| match item {
            JsonValue::String(s) => Ok(s.clone()),
            other => Err(Error::wrong_type(
                format!("{}[{idx}]", join_path(parent, key)),
                "a string",
                kind_of(other),
            )),
        })
        .collect()
}

/// Interpret a list element as an object
pub fn element<'a>(item: &'a JsonValue, path: impl FnOnce() -> String) -> Result<&'a JsonObject> {
    item.as_object()
        .ok_or_else(|| Error::wrong_type(path(), "an object", kind_of(item)))
}

// ============================================================================
// Leaf accessors
// ============================================================================

/// String value; anything else is `None`
pub fn text(obj: &JsonObject, key: &str) -> Option<String> {
    present(obj, key).and_then(JsonValue::as_str).map(String::from)
}

/// Any present, non-null value rendered as a string.
///
/// Used for fields that arrive as either strings or numbers, such as
/// `season` (`2019` or `"2019/20"`) and `event.group`.
pub fn stringified(obj: &JsonObject, key: &str) -> Option<String> {
    present(obj, key).map(|v| match v {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    })
}

/// Integer value. Accepts whole floats and numeric strings.
#[allow(clippy::cast_precision_loss)]
pub fn integer(obj: &JsonObject, key: &str) -> Option<i64> {
    match present(obj, key)? {
        JsonValue::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Fractional value. Accepts integers and numeric strings.
pub fn number(obj: &JsonObject, key: &str) -> Option<f64> {
    match present(obj, key)? {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Boolean flag, `false` unless explicitly `true`
pub fn flag(obj: &JsonObject, key: &str) -> bool {
    present(obj, key)
        .and_then(JsonValue::as_bool)
        .unwrap_or(false)
}

/// Run/extra count, `0` when absent
pub fn count(obj: Option<&JsonObject>, key: &str) -> i64 {
    obj.and_then(|o| integer(o, key)).unwrap_or(0)
}
