/*!
 * Test doubles for the driver extension points
 *
 * - `ColumnPerLocaleDriver`: a third-party layout storing each locale in its
 *   own `{attribute}_{locale}` column, configured through extra options
 * - `FailingSink`: an event sink that always errors
 */

use serde_json::Value;
use std::sync::Arc;

use polyglot_columns::attribute::AttributePath;
use polyglot_columns::drivers::{DriverCore, DriverInit, TranslationDriver};
use polyglot_columns::errors::{CallbackError, Result, TranslatableError};
use polyglot_columns::events::{EventSink, TranslationSet};
use polyglot_columns::query::{ColumnPath, Predicate};
use polyglot_columns::{LocaleMap, Record};

/// Registry name used by the tests
pub const COLUMN_PER_LOCALE_DRIVER: &str = "column_per_locale";

/// One plain column per locale
#[derive(Debug)]
pub struct ColumnPerLocaleDriver {
    core: DriverCore,
    locales: Vec<String>,
}

impl ColumnPerLocaleDriver {
    pub fn new(init: DriverInit) -> Result<Self> {
        Self::with_name(COLUMN_PER_LOCALE_DRIVER, init)
    }

    /// Build the driver under a registry name chosen at runtime
    pub fn with_name(name: impl Into<String>, init: DriverInit) -> Result<Self> {
        let locales = match init.options.extra.get("locales") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            _ => {
                return Err(TranslatableError::InvalidConfig(
                    "column_per_locale requires a 'locales' list".to_string(),
                ))
            }
        };

        let core = DriverCore::new(name, init);
        core.reject_nested()?;
        Ok(Self { core, locales })
    }

    /// Factory suitable for `DriverRegistry::register`
    pub fn factory(init: DriverInit) -> Result<Arc<dyn TranslationDriver>> {
        Ok(Arc::new(Self::new(init)?))
    }

    /// Factory registering the layout under `name`
    pub fn named_factory(
        name: String,
    ) -> impl Fn(DriverInit) -> Result<Arc<dyn TranslationDriver>> + Send + Sync + 'static {
        move |init| Ok(Arc::new(Self::with_name(name.clone(), init)?) as Arc<dyn TranslationDriver>)
    }

    fn column_for(&self, locale: &str) -> String {
        format!("{}_{}", self.core.attribute_name(), locale)
    }
}

impl TranslationDriver for ColumnPerLocaleDriver {
    fn name(&self) -> &str {
        self.core.driver_name()
    }

    fn attribute(&self) -> &AttributePath {
        self.core.attribute()
    }

    fn get(&self, record: &dyn Record, locale: &str, use_fallback: bool) -> Option<Value> {
        let translations = self.all(record, None);
        self.core.resolve_from(record, &translations, locale, use_fallback)
    }

    fn set(&self, record: &mut dyn Record, locale: &str, value: Value) -> Result<()> {
        if !self.locales.iter().any(|known| known == locale) {
            return Err(TranslatableError::Driver(format!("no column for locale {}", locale)));
        }
        let column = self.column_for(locale);
        let old_value = record.raw_attribute(&column).cloned();
        record.set_raw_attribute(&column, value.clone());
        self.core.emit_set(record, locale, old_value.as_ref(), &value);
        Ok(())
    }

    fn forget(&self, record: &mut dyn Record, locale: &str) -> Result<()> {
        let column = self.column_for(locale);
        if record.raw_attribute(&column).is_some() {
            record.set_raw_attribute(&column, Value::Null);
        }
        Ok(())
    }

    fn forget_all(&self, record: &mut dyn Record, _as_null: bool) -> Result<()> {
        for locale in &self.locales {
            self.forget(record, locale)?;
        }
        Ok(())
    }

    fn all(&self, record: &dyn Record, allowed_locales: Option<&[&str]>) -> LocaleMap {
        let translations = self
            .locales
            .iter()
            .filter_map(|locale| {
                record
                    .raw_attribute(&self.column_for(locale))
                    .filter(|value| !value.is_null())
                    .map(|value| (locale.clone(), value.clone()))
            })
            .collect();
        self.core.filter(translations, allowed_locales)
    }

    fn locale_predicate(&self, locale: &str) -> Predicate {
        Predicate::not_null(ColumnPath::column(self.column_for(locale)))
    }
}

/// Event sink that rejects every notification
#[derive(Debug, Default)]
pub struct FailingSink;

impl EventSink for FailingSink {
    fn notify(&self, _event: &TranslationSet<'_>) -> std::result::Result<(), CallbackError> {
        Err("listener exploded".into())
    }
}
