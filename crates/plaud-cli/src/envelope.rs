//! Response envelope unwrapping
//!
//! The list endpoints return their records in several shapes depending on
//! API version: a bare array, or an object carrying the array under one of a
//! few keys. Unwrapping is lenient: an unrecognized shape yields no records.

use serde_json::Value;
use tracing::warn;

/// Keys checked, in priority order, for the record array
pub const RECORD_KEYS: [&str; 5] = ["list", "data", "files", "recordings", "items"];

/// Keys checked, in priority order, for the device array
const DEVICE_KEYS: [&str; 2] = ["data", "list"];

/// Outcome of inspecting an envelope
#[derive(Debug, Clone, PartialEq)]
pub enum Unwrapped {
    /// Records found in a recognized position
    Records(Vec<Value>),
    /// No array anywhere in the envelope; carries the raw payload
    Unrecognized(Value),
}

/// Locate the record array inside an envelope.
///
/// Priority: the envelope itself, then [`RECORD_KEYS`] in order, then the
/// first property (in document order) whose value is an array.
pub fn classify(envelope: Value) -> Unwrapped {
    match envelope {
        Value::Array(records) => Unwrapped::Records(records),
        Value::Object(mut map) => {
            let key = RECORD_KEYS
                .iter()
                .map(|k| k.to_string())
                .find(|k| map.get(k).is_some_and(Value::is_array))
                .or_else(|| {
                    map.iter()
                        .find(|(_, v)| v.is_array())
                        .map(|(k, _)| k.clone())
                });

            match key.and_then(|k| map.remove(&k)) {
                Some(Value::Array(records)) => Unwrapped::Records(records),
                _ => Unwrapped::Unrecognized(Value::Object(map)),
            }
        },
        other => Unwrapped::Unrecognized(other),
    }
}

/// Lenient unwrapping: records, or an empty list when none can be found.
///
/// An unrecognized shape is logged, since it reads the same as "no records".
pub fn unwrap_records(envelope: Value) -> Vec<Value> {
    match classify(envelope) {
        Unwrapped::Records(records) => records,
        Unwrapped::Unrecognized(raw) => {
            let keys: Vec<&str> = raw
                .as_object()
                .map(|map| map.keys().map(String::as_str).collect())
                .unwrap_or_default();
            warn!(?keys, "No record array found in API response");
            Vec::new()
        },
    }
}

/// Unwrap the device list response.
///
/// Devices sit in a bare array or under `data` / `list`. Anything else is
/// returned whole as a single opaque item so callers still see the payload.
pub fn unwrap_devices(envelope: Value) -> Vec<Value> {
    match envelope {
        Value::Array(devices) => devices,
        Value::Object(mut map) => {
            let key = DEVICE_KEYS
                .iter()
                .find(|k| map.get(**k).is_some_and(Value::is_array));

            match key.and_then(|k| map.remove(*k)) {
                Some(Value::Array(devices)) => devices,
                _ => vec![Value::Object(map)],
            }
        },
        other => vec![other],
    }
}

/// Identifier of a record, if it has one.
///
/// String ids are used as-is; numeric ids are stringified.
pub fn record_id(record: &Value) -> Option<String> {
    match record.get("id")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
