/*!
 * Translation notifications.
 *
 * Drivers push a `TranslationSet` to an injected `EventSink` after every
 * write. Delivery is fire-and-forget: a failing sink is logged and ignored.
 */

use log::debug;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Debug;

use crate::errors::CallbackError;
use crate::record::Record;

/// A translation was written
#[derive(Debug, Clone, Copy)]
pub struct TranslationSet<'a> {
    /// Record that was mutated
    pub record: &'a dyn Record,
    /// Logical attribute name
    pub attribute: &'a str,
    /// Locale written
    pub locale: &'a str,
    /// Value before the write, if any
    pub old_value: Option<&'a Value>,
    /// Value after the write
    pub new_value: &'a Value,
}

impl TranslationSet<'_> {
    /// Owned copy detached from the record borrow
    pub fn to_owned_event(&self) -> TranslationSetRecord {
        TranslationSetRecord {
            record_type: self.record.record_type().to_string(),
            attribute: self.attribute.to_string(),
            locale: self.locale.to_string(),
            old_value: self.old_value.cloned(),
            new_value: self.new_value.clone(),
        }
    }
}

/// Owned form of `TranslationSet`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationSetRecord {
    pub record_type: String,
    pub attribute: String,
    pub locale: String,
    pub old_value: Option<Value>,
    pub new_value: Value,
}

/// Receiver of translation notifications
pub trait EventSink: Send + Sync + Debug {
    fn notify(&self, event: &TranslationSet<'_>) -> Result<(), CallbackError>;
}

/// Discards every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn notify(&self, _event: &TranslationSet<'_>) -> Result<(), CallbackError> {
        Ok(())
    }
}

/// Logs notifications at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn notify(&self, event: &TranslationSet<'_>) -> Result<(), CallbackError> {
        debug!(
            "Translation set on {}.{} [{}]: {:?} -> {}",
            event.record.record_type(),
            event.attribute,
            event.locale,
            event.old_value,
            event.new_value
        );
        Ok(())
    }
}

/// Keeps owned copies of every notification
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Mutex<Vec<TranslationSetRecord>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the notifications received so far
    pub fn events(&self) -> Vec<TranslationSetRecord> {
        self.events.lock().clone()
    }

    /// Remove and return the collected notifications
    pub fn drain(&self) -> Vec<TranslationSetRecord> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl EventSink for CollectingSink {
    fn notify(&self, event: &TranslationSet<'_>) -> Result<(), CallbackError> {
        self.events.lock().push(event.to_owned_event());
        Ok(())
    }
}
