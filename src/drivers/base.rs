/*!
 * Behaviour shared by every layout.
 *
 * Each built-in driver embeds a `DriverCore` and delegates locale fallback,
 * value filtering, the missing-translation hook and notifications to it.
 */

use log::{debug, warn};
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::app_config::Config;
use crate::attribute::{AttributePath, DriverOptions};
use crate::codec::LocaleMap;
use crate::errors::{CallbackError, Result, TranslatableError};
use crate::events::{EventSink, NullSink, TranslationSet};
use crate::record::Record;

/// A read resolved to a different locale than requested
#[derive(Debug, Clone, Copy)]
pub struct MissingTranslation<'a> {
    pub record: &'a dyn Record,
    pub attribute: &'a str,
    pub requested_locale: &'a str,
    pub resolved_locale: &'a str,
    /// Value found for `resolved_locale`, if any
    pub value: Option<&'a Value>,
}

/// Callback substituting a value when a read misses the requested locale.
///
/// `Ok(Some(value))` replaces the result, `Ok(None)` keeps it, and an error
/// is logged and otherwise ignored.
pub trait MissingTranslationHook: Send + Sync {
    fn on_missing(&self, miss: &MissingTranslation<'_>) -> std::result::Result<Option<Value>, CallbackError>;
}

impl<F> MissingTranslationHook for F
where
    F: Fn(&MissingTranslation<'_>) -> std::result::Result<Option<Value>, CallbackError> + Send + Sync,
{
    fn on_missing(&self, miss: &MissingTranslation<'_>) -> std::result::Result<Option<Value>, CallbackError> {
        self(miss)
    }
}

/// Package-wide state shared by every driver instance
pub struct DriverSettings {
    /// Policy configuration
    pub config: Config,
    /// Receiver of `TranslationSet` notifications
    pub events: Arc<dyn EventSink>,
    /// Optional substitute for missed locales
    pub missing_translation_hook: Option<Arc<dyn MissingTranslationHook>>,
}

impl DriverSettings {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            events: Arc::new(NullSink),
            missing_translation_hook: None,
        }
    }

    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn with_missing_translation_hook<H>(mut self, hook: H) -> Self
    where
        H: MissingTranslationHook + 'static,
    {
        self.missing_translation_hook = Some(Arc::new(hook));
        self
    }
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl fmt::Debug for DriverSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverSettings")
            .field("config", &self.config)
            .field("events", &self.events)
            .field("missing_translation_hook", &self.missing_translation_hook.is_some())
            .finish()
    }
}

/// Everything a driver constructor receives
#[derive(Debug, Clone)]
pub struct DriverInit {
    pub attribute: AttributePath,
    pub options: DriverOptions,
    pub settings: Arc<DriverSettings>,
}

/// Shared state and behaviour embedded in each built-in driver
#[derive(Debug)]
pub struct DriverCore {
    driver: String,
    attribute: AttributePath,
    attribute_name: String,
    options: DriverOptions,
    settings: Arc<DriverSettings>,
    storage_column: OnceCell<String>,
    base_locale: OnceCell<String>,
}

impl DriverCore {
    pub fn new(driver: impl Into<String>, init: DriverInit) -> Self {
        let attribute_name = init.attribute.name();
        Self {
            driver: driver.into(),
            attribute: init.attribute,
            attribute_name,
            options: init.options,
            settings: init.settings,
            storage_column: OnceCell::new(),
            base_locale: OnceCell::new(),
        }
    }

    /// Fail when the attribute addresses a nested JSON path
    pub fn reject_nested(&self) -> Result<()> {
        if self.attribute.is_nested() {
            return Err(TranslatableError::NestedPathUnsupported {
                driver: self.driver.clone(),
                attribute: self.attribute_name.clone(),
            });
        }
        Ok(())
    }

    pub fn driver_name(&self) -> &str {
        &self.driver
    }

    pub fn attribute(&self) -> &AttributePath {
        &self.attribute
    }

    pub fn attribute_name(&self) -> &str {
        &self.attribute_name
    }

    pub fn options(&self) -> &DriverOptions {
        &self.options
    }

    pub fn config(&self) -> &Config {
        &self.settings.config
    }

    /// Shared JSON column, resolved once
    pub fn storage_column(&self) -> &str {
        self.storage_column.get_or_init(|| {
            self.options
                .storage_column
                .clone()
                .unwrap_or_else(|| self.config().shared_column.clone())
        })
    }

    /// Base locale, resolved once
    pub fn base_locale(&self) -> &str {
        self.base_locale.get_or_init(|| {
            self.options
                .base_locale
                .clone()
                .unwrap_or_else(|| self.config().base_locale.clone())
        })
    }

    /// The record's own fallback locale, else the configured one
    pub fn fallback_locale<'a>(&'a self, record: &'a dyn Record) -> Option<&'a str> {
        record
            .fallback_locale()
            .or(self.config().fallback_locale.as_deref())
    }

    /// Pick the locale a read should use.
    ///
    /// # Arguments
    /// * `translated` - Retained translations of the attribute
    /// * `record` - Record being read, for its fallback locale
    /// * `requested` - Locale asked for
    /// * `use_fallback` - Whether another locale may be substituted
    pub fn resolve_locale(
        &self,
        translated: &LocaleMap,
        record: &dyn Record,
        requested: &str,
        use_fallback: bool,
    ) -> String {
        if translated.contains_key(requested) || !use_fallback {
            return requested.to_string();
        }

        if let Some(fallback) = self.fallback_locale(record) {
            if translated.contains_key(fallback) {
                return fallback.to_string();
            }
        }

        if self.config().fallback_any {
            if let Some(first) = translated.keys().next() {
                return first.clone();
            }
        }

        requested.to_string()
    }

    /// Whether the retention policy keeps this value
    pub fn is_retained(&self, value: &Value) -> bool {
        match value {
            Value::Null => self.config().allow_null,
            Value::String(text) if text.is_empty() => self.config().allow_empty_string,
            _ => true,
        }
    }

    /// Apply the retention policy and an optional locale allow-list
    pub fn filter(&self, translations: LocaleMap, allowed_locales: Option<&[&str]>) -> LocaleMap {
        translations
            .into_iter()
            .filter(|(locale, value)| {
                self.is_retained(value)
                    && allowed_locales
                        .map(|allowed| allowed.contains(&locale.as_str()))
                        .unwrap_or(true)
            })
            .collect()
    }

    /// Generic fallback read over an already-filtered translation map
    pub fn resolve_from(
        &self,
        record: &dyn Record,
        translations: &LocaleMap,
        requested: &str,
        use_fallback: bool,
    ) -> Option<Value> {
        let resolved = self.resolve_locale(translations, record, requested, use_fallback);
        let value = translations.get(&resolved).cloned();
        self.finish_get(record, requested, &resolved, value)
    }

    /// Run the missing-translation hook when the locale changed
    pub fn finish_get(
        &self,
        record: &dyn Record,
        requested: &str,
        resolved: &str,
        value: Option<Value>,
    ) -> Option<Value> {
        if requested == resolved {
            return value;
        }

        let Some(hook) = &self.settings.missing_translation_hook else {
            return value;
        };

        let miss = MissingTranslation {
            record,
            attribute: &self.attribute_name,
            requested_locale: requested,
            resolved_locale: resolved,
            value: value.as_ref(),
        };

        match hook.on_missing(&miss) {
            Ok(Some(substitute)) => Some(substitute),
            Ok(None) => value,
            Err(e) => {
                warn!(
                    "Missing-translation hook failed for {}.{} [{}]: {}",
                    record.record_type(),
                    self.attribute_name,
                    requested,
                    e
                );
                value
            }
        }
    }

    /// Notify the event sink after a write
    pub fn emit_set(&self, record: &dyn Record, locale: &str, old_value: Option<&Value>, new_value: &Value) {
        let event = TranslationSet {
            record,
            attribute: &self.attribute_name,
            locale,
            old_value,
            new_value,
        };

        if let Err(e) = self.settings.events.notify(&event) {
            warn!(
                "Translation event sink failed for {}.{} [{}]: {}",
                record.record_type(),
                self.attribute_name,
                locale,
                e
            );
        } else {
            debug!(
                "Set {}.{} [{}] via {} driver",
                record.record_type(),
                self.attribute_name,
                locale,
                self.driver
            );
        }
    }
}
