/*!
 * Primitives for the shared `{locale: {attribute: value}}` column.
 */

use serde_json::{Map, Value};

use crate::codec::{self, LocaleMap};
use crate::record::Record;

/// Decode the shared column of a record
pub fn read(record: &dyn Record, column: &str) -> LocaleMap {
    codec::decode(record.raw_attribute(column))
}

/// Encode and store the shared column
pub fn write(record: &mut dyn Record, column: &str, shared: &LocaleMap) {
    record.set_raw_attribute(column, Value::String(codec::encode(shared)));
}

/// Value stored for `attribute` under `locale`
pub fn get<'a>(shared: &'a LocaleMap, locale: &str, attribute: &str) -> Option<&'a Value> {
    shared.get(locale)?.as_object()?.get(attribute)
}

/// Store a value, returning the previous one
pub fn put(shared: &mut LocaleMap, locale: &str, attribute: &str, value: Value) -> Option<Value> {
    let slot = shared
        .entry(locale.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    slot.as_object_mut()
        .and_then(|attributes| attributes.insert(attribute.to_string(), value))
}

/// Remove a value; empty locale objects are pruned
pub fn remove(shared: &mut LocaleMap, locale: &str, attribute: &str) -> Option<Value> {
    let attributes = shared.get_mut(locale)?.as_object_mut()?;
    let removed = attributes.shift_remove(attribute)?;
    if attributes.is_empty() {
        shared.shift_remove(locale);
    }
    Some(removed)
}

/// Remove `attribute` under every locale; returns whether anything changed
pub fn remove_everywhere(shared: &mut LocaleMap, attribute: &str) -> bool {
    let locales: Vec<String> = shared.keys().cloned().collect();
    let mut changed = false;
    for locale in locales {
        changed |= remove(shared, &locale, attribute).is_some();
    }
    changed
}

/// Locale → value for one attribute, in storage order
pub fn collect(shared: &LocaleMap, attribute: &str) -> LocaleMap {
    shared
        .iter()
        .filter_map(|(locale, attributes)| {
            attributes
                .as_object()
                .and_then(|attributes| attributes.get(attribute))
                .map(|value| (locale.clone(), value.clone()))
        })
        .collect()
}
