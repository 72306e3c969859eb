/*!
 * Storage codec for JSON-typed columns.
 *
 * Columns arrive either as JSON text (as read from a database) or as an
 * already-decoded JSON value. Anything that is not an object decodes to an
 * empty map so that corrupt historical data reads as "no translations".
 */

use log::debug;
use serde_json::{Map, Value};

/// Locale → value mapping, in insertion order
pub type LocaleMap = Map<String, Value>;

/// Decode a raw column value into a JSON object
pub fn decode(raw: Option<&Value>) -> LocaleMap {
    match raw {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(map)) => map.clone(),
        Some(Value::String(text)) => {
            if text.trim().is_empty() {
                return Map::new();
            }
            match serde_json::from_str::<Value>(text) {
                Ok(Value::Object(map)) => map,
                Ok(other) => {
                    debug!("Ignoring non-object JSON column value: {}", type_name(&other));
                    Map::new()
                }
                Err(e) => {
                    debug!("Ignoring malformed JSON column value: {}", e);
                    Map::new()
                }
            }
        }
        Some(other) => {
            debug!("Ignoring {} column value where JSON was expected", type_name(other));
            Map::new()
        }
    }
}

/// Encode a map as compact JSON text.
///
/// Keys keep their insertion order; non-ASCII characters and `/` are written
/// unescaped.
pub fn encode(map: &LocaleMap) -> String {
    // String-keyed maps of JSON values always serialize.
    serde_json::to_string(map).unwrap_or_else(|_| String::from("{}"))
}

/// Decode a column and return the object found under `segments`
pub fn decode_path(raw: Option<&Value>, segments: &[String]) -> LocaleMap {
    let mut current = decode(raw);
    for segment in segments {
        current = match current.remove(segment) {
            Some(Value::Object(child)) => child,
            _ => return Map::new(),
        };
    }
    current
}

/// Replace the object under `segments` inside the column's document.
///
/// Intermediate keys are created as needed and sibling keys are left as
/// they were. Returns the encoded document.
pub fn write_path(raw: Option<&Value>, segments: &[String], value: LocaleMap) -> String {
    if segments.is_empty() {
        return encode(&value);
    }

    let mut root = decode(raw);
    insert_at(&mut root, segments, value);
    encode(&root)
}

fn insert_at(target: &mut LocaleMap, segments: &[String], value: LocaleMap) {
    let Some((head, rest)) = segments.split_first() else {
        return;
    };

    if rest.is_empty() {
        target.insert(head.clone(), Value::Object(value));
        return;
    }

    let entry = target
        .entry(head.clone())
        .or_insert_with(|| Value::Object(Map::new()));
    if !entry.is_object() {
        *entry = Value::Object(Map::new());
    }
    if let Value::Object(child) = entry {
        insert_at(child, rest, value);
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
