//! Dotted path lookup over JSON documents.
//!
//! A path such as `data.items.0.title` is split on `.`; each segment is a
//! key when the current value is an object, or a zero-based index when it
//! is an array. Lookups are total: any missing key, out-of-range or
//! non-numeric index, or attempt to descend into a scalar yields `None`.

use serde_json::Value;

/// Resolve `path` against `value`.
///
/// Returns `None` ("absent") for an empty path or whenever a segment cannot
/// be followed. A JSON `null` stored in the document is returned as
/// `Some(&Value::Null)`; descending *through* it is absent like any scalar.
pub fn resolve<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }

    path.split('.').try_fold(value, |current, segment| match current {
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        Value::Object(map) => map.get(segment),
        _ => None,
    })
}

/// Resolve `path` and render the result as text.
///
/// Strings come back unchanged, numbers and booleans as their JSON text.
/// `null`, arrays and objects are treated as missing.
pub fn resolve_text(value: &Value, path: &str) -> Option<String> {
    resolve(value, path).and_then(scalar_to_text)
}

/// Render a scalar JSON value as text; `None` for null and containers.
pub fn scalar_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
