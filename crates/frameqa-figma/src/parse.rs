//! Extraction of the pieces the analyzers need from raw API payloads.
//! Listings degrade gracefully: malformed entries are skipped, not fatal.

use frameqa_core::catalog::{StyleMeta, Variable};
use frameqa_core::DocumentNode;
use serde_json::Value;

/// `nodes[id].document` of a nodes response. A missing entry, or one the API
/// reports as `null`, yields `None`.
pub fn node_document(body: &Value, node_id: &str) -> Result<Option<DocumentNode>, serde_json::Error> {
    match body.get("nodes").and_then(|nodes| nodes.get(node_id)) {
        Some(entry) => match entry.get("document") {
            Some(doc) if !doc.is_null() => serde_json::from_value(doc.clone()).map(Some),
            _ => Ok(None),
        },
        None => Ok(None),
    }
}

/// `meta.styles` of a styles response.
pub fn style_list(body: &Value) -> Vec<StyleMeta> {
    body.pointer("/meta/styles")
        .and_then(Value::as_array)
        .map(|styles| {
            styles
                .iter()
                .filter_map(|s| serde_json::from_value(s.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

/// `meta.variables` of a local-variables response, in map order.
pub fn variable_list(body: &Value) -> Vec<Variable> {
    body.pointer("/meta/variables")
        .and_then(Value::as_object)
        .map(|vars| {
            vars.values()
                .filter_map(|v| serde_json::from_value(v.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

/// Upstream error text from an error body (`err`, then `message`).
pub fn error_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    ["err", "message"]
        .iter()
        .find_map(|k| value.get(*k).and_then(Value::as_str))
        .map(str::to_string)
}
