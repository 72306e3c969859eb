/*!
 * Extra-only layout: every locale, base included, lives in the shared column
 * under `[locale][attribute]`. The attribute has no column of its own.
 */

use serde_json::Value;

use super::base::{DriverCore, DriverInit};
use super::shared_column;
use super::{TranslationDriver, EXTRA_ONLY_DRIVER};
use crate::attribute::AttributePath;
use crate::codec::LocaleMap;
use crate::errors::Result;
use crate::query::{ColumnPath, Predicate};
use crate::record::Record;

#[derive(Debug)]
pub struct ExtraOnlyColumnDriver {
    core: DriverCore,
}

impl ExtraOnlyColumnDriver {
    /// Build the driver; nested attribute paths are rejected
    pub fn new(init: DriverInit) -> Result<Self> {
        let core = DriverCore::new(EXTRA_ONLY_DRIVER, init);
        core.reject_nested()?;
        Ok(Self { core })
    }

    pub fn core(&self) -> &DriverCore {
        &self.core
    }

    fn retained(&self, value: Option<&Value>) -> Option<Value> {
        value.filter(|value| self.core.is_retained(value)).cloned()
    }
}

impl TranslationDriver for ExtraOnlyColumnDriver {
    fn name(&self) -> &str {
        EXTRA_ONLY_DRIVER
    }

    fn attribute(&self) -> &AttributePath {
        self.core.attribute()
    }

    fn get(&self, record: &dyn Record, locale: &str, use_fallback: bool) -> Option<Value> {
        let attribute = self.core.attribute_name();
        let base = self.core.base_locale();
        let shared = shared_column::read(record, self.core.storage_column());

        if let Some(value) = self.retained(shared_column::get(&shared, locale, attribute)) {
            return Some(value);
        }
        if !use_fallback {
            return None;
        }

        if locale != base {
            let base_value = self.retained(shared_column::get(&shared, base, attribute));
            if base_value.is_some() {
                return self.core.finish_get(record, locale, base, base_value);
            }
        }

        let translations = self
            .core
            .filter(shared_column::collect(&shared, attribute), None);
        self.core.resolve_from(record, &translations, locale, true)
    }

    fn set(&self, record: &mut dyn Record, locale: &str, value: Value) -> Result<()> {
        let storage = self.core.storage_column();
        let mut shared = shared_column::read(record, storage);
        let old_value =
            shared_column::put(&mut shared, locale, self.core.attribute_name(), value.clone());
        shared_column::write(record, storage, &shared);

        self.core.emit_set(record, locale, old_value.as_ref(), &value);
        Ok(())
    }

    fn forget(&self, record: &mut dyn Record, locale: &str) -> Result<()> {
        let storage = self.core.storage_column();
        let mut shared = shared_column::read(record, storage);
        if shared_column::remove(&mut shared, locale, self.core.attribute_name()).is_some() {
            shared_column::write(record, storage, &shared);
        }
        Ok(())
    }

    fn forget_all(&self, record: &mut dyn Record, as_null: bool) -> Result<()> {
        let storage = self.core.storage_column();
        let mut shared = shared_column::read(record, storage);
        if !shared_column::remove_everywhere(&mut shared, self.core.attribute_name()) {
            return Ok(());
        }

        // The column may hold other attributes; only blank it once empty.
        if as_null && shared.is_empty() {
            record.set_raw_attribute(storage, Value::Null);
        } else {
            shared_column::write(record, storage, &shared);
        }
        Ok(())
    }

    fn all(&self, record: &dyn Record, allowed_locales: Option<&[&str]>) -> LocaleMap {
        let shared = shared_column::read(record, self.core.storage_column());
        self.core.filter(
            shared_column::collect(&shared, self.core.attribute_name()),
            allowed_locales,
        )
    }

    fn locale_predicate(&self, locale: &str) -> Predicate {
        Predicate::not_null(
            ColumnPath::column(self.core.storage_column())
                .key(locale)
                .key(self.core.attribute_name()),
        )
    }
}
