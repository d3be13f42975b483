//! Legacy document shapes.
//!
//! Older writers emitted endpoints as `{"type": "pin", "designator", "pin"}`
//! and `{"type": "core", "designator", "core"}`. They are rewritten in place to
//! the current `connector_pin` / `cable_core` shapes before typed decoding.

use serde_json::{Map, Value};

/// Rewrite legacy endpoint shapes under `data.mapping`. Returns how many
/// endpoints were rewritten.
pub fn migrate_legacy_endpoints(document: &mut Value) -> usize {
    let Some(mapping) = document
        .get_mut("data")
        .and_then(|d| d.get_mut("mapping"))
        .and_then(Value::as_object_mut)
    else {
        return 0;
    };

    let mut rewritten = 0;
    for (key, connection) in mapping.iter_mut() {
        for end in ["end1", "end2"] {
            let Some(endpoint) = connection.get_mut(end).and_then(Value::as_object_mut) else {
                continue;
            };
            if migrate_endpoint(endpoint) {
                tracing::warn!(connection = %key, end, "rewrote legacy endpoint shape");
                rewritten += 1;
            }
        }
    }
    rewritten
}

fn migrate_endpoint(endpoint: &mut Map<String, Value>) -> bool {
    let (new_type, component_field, index_from, index_to) =
        match endpoint.get("type").and_then(Value::as_str) {
            Some("pin") => ("connector_pin", "connector_instance", "pin", "pin"),
            Some("core") => ("cable_core", "cable_instance", "core", "core_no"),
            _ => return false,
        };

    endpoint.insert("type".to_string(), Value::from(new_type));
    if let Some(designator) = endpoint.remove("designator") {
        endpoint.insert(component_field.to_string(), designator);
    }
    if index_from != index_to
        && let Some(index) = endpoint.remove(index_from)
    {
        endpoint.insert(index_to.to_string(), index);
    }
    endpoint
        .entry("side")
        .or_insert_with(|| Value::from("left"));
    true
}
