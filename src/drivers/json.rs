/*!
 * JSON column layout.
 *
 * The attribute's own column holds `{locale: value}`. A nested attribute
 * (`meta->title`) keeps that object under a path inside a larger document;
 * writes replace only that path.
 */

use serde_json::Value;

use super::base::{DriverCore, DriverInit};
use super::{TranslationDriver, JSON_DRIVER};
use crate::attribute::AttributePath;
use crate::codec::{self, LocaleMap};
use crate::errors::Result;
use crate::query::{ColumnPath, Predicate};
use crate::record::Record;

/// Every locale in one JSON object
#[derive(Debug)]
pub struct JsonColumnDriver {
    core: DriverCore,
}

impl JsonColumnDriver {
    pub fn new(init: DriverInit) -> Result<Self> {
        Ok(Self {
            core: DriverCore::new(JSON_DRIVER, init),
        })
    }

    pub fn core(&self) -> &DriverCore {
        &self.core
    }

    fn column(&self) -> &str {
        self.core.attribute().column()
    }

    /// Unfiltered translations as stored
    fn stored(&self, record: &dyn Record) -> LocaleMap {
        codec::decode_path(
            record.raw_attribute(self.column()),
            self.core.attribute().segments(),
        )
    }

    fn store(&self, record: &mut dyn Record, translations: LocaleMap) {
        let column = self.column();
        let text = codec::write_path(
            record.raw_attribute(column),
            self.core.attribute().segments(),
            translations,
        );
        record.set_raw_attribute(column, Value::String(text));
    }
}

impl TranslationDriver for JsonColumnDriver {
    fn name(&self) -> &str {
        JSON_DRIVER
    }

    fn attribute(&self) -> &AttributePath {
        self.core.attribute()
    }

    fn get(&self, record: &dyn Record, locale: &str, use_fallback: bool) -> Option<Value> {
        let translations = self.all(record, None);
        self.core
            .resolve_from(record, &translations, locale, use_fallback)
    }

    fn set(&self, record: &mut dyn Record, locale: &str, value: Value) -> Result<()> {
        let mut translations = self.stored(record);
        let old_value = translations.insert(locale.to_string(), value.clone());
        self.store(record, translations);

        self.core.emit_set(record, locale, old_value.as_ref(), &value);
        Ok(())
    }

    fn forget(&self, record: &mut dyn Record, locale: &str) -> Result<()> {
        let mut translations = self.stored(record);
        if translations.shift_remove(locale).is_some() {
            self.store(record, translations);
        }
        Ok(())
    }

    fn forget_all(&self, record: &mut dyn Record, as_null: bool) -> Result<()> {
        if as_null && !self.core.attribute().is_nested() {
            record.set_raw_attribute(self.column(), Value::Null);
        } else {
            self.store(record, LocaleMap::new());
        }
        Ok(())
    }

    fn all(&self, record: &dyn Record, allowed_locales: Option<&[&str]>) -> LocaleMap {
        self.core.filter(self.stored(record), allowed_locales)
    }

    fn locale_predicate(&self, locale: &str) -> Predicate {
        let attribute = self.core.attribute();
        Predicate::not_null(
            ColumnPath::column(attribute.column())
                .keys(attribute.segments().iter().cloned())
                .key(locale),
        )
    }
}
