/*!
 * Hybrid layout.
 *
 * The base locale lives in a plain column named after the attribute, so the
 * most common read never touches JSON. Every other locale lives in the shared
 * column under `[locale][attribute]`. A base-locale write removes any copy
 * left in the shared column unless `force_base_duplicate` is set.
 *
 * A `null` base value cannot be told apart from a missing one in the plain
 * column alone, so it is also recorded as `null` under the shared column's
 * base entry.
 */

use serde_json::Value;

use super::base::{DriverCore, DriverInit};
use super::shared_column;
use super::{TranslationDriver, HYBRID_DRIVER};
use crate::attribute::AttributePath;
use crate::codec::LocaleMap;
use crate::errors::Result;
use crate::query::{ColumnPath, Predicate};
use crate::record::Record;

/// Base locale in a plain column, the rest in a shared JSON column
#[derive(Debug)]
pub struct HybridColumnDriver {
    core: DriverCore,
}

impl HybridColumnDriver {
    /// Build the driver; nested attribute paths are rejected
    pub fn new(init: DriverInit) -> Result<Self> {
        let core = DriverCore::new(HYBRID_DRIVER, init);
        core.reject_nested()?;
        Ok(Self { core })
    }

    pub fn core(&self) -> &DriverCore {
        &self.core
    }

    fn plain_column(&self) -> &str {
        self.core.attribute().column()
    }

    fn is_base(&self, locale: &str) -> bool {
        locale == self.core.base_locale()
    }

    /// Plain column value; `null` counts as absent
    fn plain_value<'a>(&self, record: &'a dyn Record) -> Option<&'a Value> {
        record
            .raw_attribute(self.plain_column())
            .filter(|value| !value.is_null())
    }

    /// Stored base translation, including an explicit `null`
    fn base_value(&self, record: &dyn Record) -> Option<Value> {
        match record.raw_attribute(self.plain_column()) {
            Some(Value::Null) => {
                let shared = shared_column::read(record, self.core.storage_column());
                shared_column::get(&shared, self.core.base_locale(), self.core.attribute_name())
                    .filter(|value| value.is_null())
                    .cloned()
            }
            value => value.cloned(),
        }
    }

    fn retained(&self, value: Option<&Value>) -> Option<Value> {
        value.filter(|value| self.core.is_retained(value)).cloned()
    }
}

impl TranslationDriver for HybridColumnDriver {
    fn name(&self) -> &str {
        HYBRID_DRIVER
    }

    fn attribute(&self) -> &AttributePath {
        self.core.attribute()
    }

    fn get(&self, record: &dyn Record, locale: &str, use_fallback: bool) -> Option<Value> {
        let attribute = self.core.attribute_name();
        let base = self.core.base_locale();

        if self.is_base(locale) {
            if let Some(value) = self.retained(self.base_value(record).as_ref()) {
                return Some(value);
            }
        } else {
            let shared = shared_column::read(record, self.core.storage_column());
            if let Some(value) = self.retained(shared_column::get(&shared, locale, attribute)) {
                return Some(value);
            }
            if !use_fallback {
                return None;
            }

            let base_value = self
                .retained(shared_column::get(&shared, base, attribute))
                .or_else(|| self.retained(self.plain_value(record)));
            if base_value.is_some() {
                return self.core.finish_get(record, locale, base, base_value);
            }
        }

        if !use_fallback {
            return None;
        }
        let translations = self.all(record, None);
        self.core.resolve_from(record, &translations, locale, true)
    }

    fn set(&self, record: &mut dyn Record, locale: &str, value: Value) -> Result<()> {
        let attribute = self.core.attribute_name();
        let storage = self.core.storage_column();
        let mut shared = shared_column::read(record, storage);

        let old_value = if self.is_base(locale) {
            let old_value = self.plain_value(record).cloned();
            record.set_raw_attribute(self.plain_column(), value.clone());

            if self.core.options().force_base_duplicate || value.is_null() {
                shared_column::put(&mut shared, locale, attribute, value.clone());
                shared_column::write(record, storage, &shared);
            } else if shared_column::remove(&mut shared, locale, attribute).is_some() {
                shared_column::write(record, storage, &shared);
            }
            old_value
        } else {
            let old_value = shared_column::put(&mut shared, locale, attribute, value.clone());
            shared_column::write(record, storage, &shared);
            old_value
        };

        self.core.emit_set(record, locale, old_value.as_ref(), &value);
        Ok(())
    }

    fn forget(&self, record: &mut dyn Record, locale: &str) -> Result<()> {
        let storage = self.core.storage_column();
        let mut shared = shared_column::read(record, storage);

        if self.is_base(locale) && self.plain_value(record).is_some() {
            record.set_raw_attribute(self.plain_column(), Value::Null);
        }
        if shared_column::remove(&mut shared, locale, self.core.attribute_name()).is_some() {
            shared_column::write(record, storage, &shared);
        }
        Ok(())
    }

    fn forget_all(&self, record: &mut dyn Record, as_null: bool) -> Result<()> {
        let blank = if as_null {
            Value::Null
        } else {
            Value::String(String::new())
        };
        record.set_raw_attribute(self.plain_column(), blank);

        let storage = self.core.storage_column();
        let mut shared = shared_column::read(record, storage);
        if shared_column::remove_everywhere(&mut shared, self.core.attribute_name()) {
            shared_column::write(record, storage, &shared);
        }
        Ok(())
    }

    fn all(&self, record: &dyn Record, allowed_locales: Option<&[&str]>) -> LocaleMap {
        let base = self.core.base_locale();
        let mut translations = LocaleMap::new();

        if let Some(value) = self.plain_value(record) {
            translations.insert(base.to_string(), value.clone());
        }

        let shared = shared_column::read(record, self.core.storage_column());
        for (locale, value) in shared_column::collect(&shared, self.core.attribute_name()) {
            if locale == base && translations.contains_key(base) {
                continue;
            }
            translations.insert(locale, value);
        }

        self.core.filter(translations, allowed_locales)
    }

    fn locale_predicate(&self, locale: &str) -> Predicate {
        if self.is_base(locale) {
            Predicate::not_null(ColumnPath::column(self.plain_column()))
        } else {
            Predicate::not_null(
                ColumnPath::column(self.core.storage_column())
                    .key(locale)
                    .key(self.core.attribute_name()),
            )
        }
    }
}
