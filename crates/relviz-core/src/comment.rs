//! Speculative parsing of catalog comment strings.
//!
//! Deployments targeted by Relviz store per-column and per-table
//! configuration as a JSON object inside the catalog comment (display
//! formats, visibility overrides, descriptions). Comments are ordinary free
//! text as far as the database is concerned, so anything that does not parse
//! as a JSON object is treated as unstructured and dropped.

use serde_json::{Map, Value};

/// The JSON object embedded in a catalog comment string.
pub type StructuredComment = Map<String, Value>;

/// Parse the JSON object embedded in a raw comment string.
///
/// Returns `None` for an absent or empty comment, for invalid JSON, and for
/// valid JSON that is not an object. Never fails: a malformed comment must
/// not abort resolution of the column or table carrying it.
pub fn parse_structured(raw: Option<&str>) -> Option<StructuredComment> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Some(map),
        Ok(_) | Err(_) => None,
    }
}

/// Read a boolean flag out of a structured comment.
pub fn flag(comment: Option<&StructuredComment>, key: &str) -> bool {
    comment
        .and_then(|c| c.get(key))
        .and_then(Value::as_bool)
        .unwrap_or(false)
}
