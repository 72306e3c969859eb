/*!
 * Record attribute bag.
 *
 * The host persistence framework owns records. Drivers only see them through
 * the `Record` trait: raw attribute reads, raw attribute writes and the
 * record's own fallback locale.
 */

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Debug;

/// Raw attribute access every translatable record provides
pub trait Record: Debug {
    /// Name of the record type, e.g. `Post`
    fn record_type(&self) -> &str;

    /// Raw stored value of a column, if present
    fn raw_attribute(&self, column: &str) -> Option<&Value>;

    /// Replace the raw stored value of a column.
    ///
    /// Every driver write goes through here; hosts that run mutators or
    /// dirty-tracking hook this method.
    fn set_raw_attribute(&mut self, column: &str, value: Value);

    /// Record-level fallback locale, overriding `Config::fallback_locale`
    fn fallback_locale(&self) -> Option<&str> {
        None
    }
}

/// In-memory record backed by an ordered JSON map
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeBag {
    /// Record type name
    pub record_type: String,

    /// Column values
    #[serde(default)]
    pub attributes: Map<String, Value>,

    /// Optional per-record fallback locale
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_locale: Option<String>,
}

impl AttributeBag {
    pub fn new(record_type: impl Into<String>) -> Self {
        Self {
            record_type: record_type.into(),
            attributes: Map::new(),
            fallback_locale: None,
        }
    }

    /// Seed a column value
    pub fn with_attribute(mut self, column: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(column.into(), value);
        self
    }

    pub fn with_fallback_locale(mut self, locale: impl Into<String>) -> Self {
        self.fallback_locale = Some(locale.into());
        self
    }

    /// Whether the column exists at all
    pub fn has_attribute(&self, column: &str) -> bool {
        self.attributes.contains_key(column)
    }
}

impl Record for AttributeBag {
    fn record_type(&self) -> &str {
        &self.record_type
    }

    fn raw_attribute(&self, column: &str) -> Option<&Value> {
        self.attributes.get(column)
    }

    fn set_raw_attribute(&mut self, column: &str, value: Value) {
        self.attributes.insert(column.to_string(), value);
    }

    fn fallback_locale(&self) -> Option<&str> {
        self.fallback_locale.as_deref()
    }
}
