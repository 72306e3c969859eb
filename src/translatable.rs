/*!
 * Attribute dispatcher.
 *
 * `TranslatableAttributes` is what a record type mixes in: it is bound once
 * per record (resolving one driver per declared attribute through the
 * registry) and then routes attribute reads and writes to those drivers.
 */

use log::debug;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::attribute::ModelSchema;
use crate::codec::LocaleMap;
use crate::drivers::TranslationDriver;
use crate::errors::{Result, TranslatableError};
use crate::query::Predicate;
use crate::record::Record;
use crate::registry::DriverRegistry;

/// Driver bindings and active locale of one record
#[derive(Debug, Clone)]
pub struct TranslatableAttributes {
    record_type: String,
    bindings: Vec<(String, Arc<dyn TranslationDriver>)>,
    locale: String,
    use_fallback: bool,
}

impl TranslatableAttributes {
    /// Resolve a driver for every attribute the schema declares
    pub fn bind(registry: &DriverRegistry, schema: &ModelSchema) -> Result<Self> {
        let bindings = schema
            .attributes
            .iter()
            .map(|config| {
                registry
                    .resolve(schema, config)
                    .map(|driver| (config.attribute().name(), driver))
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "Bound {} translatable attribute(s) on {}",
            bindings.len(),
            schema.record_type
        );

        let config = registry.config();
        Ok(Self {
            record_type: schema.record_type.clone(),
            bindings,
            locale: config.locale.clone(),
            use_fallback: config.use_fallback,
        })
    }

    /// Bind using the record type's declarations from the registry's config.
    ///
    /// A record type without declarations binds no attributes.
    pub fn bind_record(registry: &DriverRegistry, record: &dyn Record) -> Result<Self> {
        match registry.config().schema(record.record_type()) {
            Some(schema) => Self::bind(registry, schema),
            None => Self::bind(registry, &ModelSchema::new(record.record_type())),
        }
    }

    pub fn record_type(&self) -> &str {
        &self.record_type
    }

    /// Active locale used by `read` and `write`
    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn set_locale(&mut self, locale: impl Into<String>) {
        self.locale = locale.into();
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.set_locale(locale);
        self
    }

    pub fn use_fallback(&self) -> bool {
        self.use_fallback
    }

    pub fn set_use_fallback(&mut self, use_fallback: bool) {
        self.use_fallback = use_fallback;
    }

    pub fn is_translatable(&self, attribute: &str) -> bool {
        self.bindings.iter().any(|(name, _)| name == attribute)
    }

    /// Declared attribute names in declaration order
    pub fn attribute_names(&self) -> Vec<&str> {
        self.bindings.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Driver bound to an attribute
    pub fn driver(&self, attribute: &str) -> Result<&Arc<dyn TranslationDriver>> {
        self.bindings
            .iter()
            .find(|(name, _)| name == attribute)
            .map(|(_, driver)| driver)
            .ok_or_else(|| TranslatableError::NotTranslatable(attribute.to_string()))
    }

    /// Read an attribute: translated in the active locale, or raw
    pub fn read(&self, record: &dyn Record, attribute: &str) -> Option<Value> {
        match self.driver(attribute) {
            Ok(driver) => driver.get(record, &self.locale, self.use_fallback),
            Err(_) => record.raw_attribute(attribute).cloned(),
        }
    }

    /// Write an attribute.
    ///
    /// For a translatable attribute a JSON object is taken as a locale map
    /// and written with `set_many`; any other value is written to the active
    /// locale. Other attributes are written raw.
    pub fn write(&self, record: &mut dyn Record, attribute: &str, value: Value) -> Result<()> {
        let Ok(driver) = self.driver(attribute) else {
            record.set_raw_attribute(attribute, value);
            return Ok(());
        };

        match value {
            Value::Object(translations) => driver.set_many(record, translations),
            other => driver.set(record, &self.locale, other),
        }
    }

    pub fn translation(
        &self,
        record: &dyn Record,
        attribute: &str,
        locale: &str,
        use_fallback: bool,
    ) -> Result<Option<Value>> {
        Ok(self.driver(attribute)?.get(record, locale, use_fallback))
    }

    pub fn translations(
        &self,
        record: &dyn Record,
        attribute: &str,
        allowed_locales: Option<&[&str]>,
    ) -> Result<LocaleMap> {
        Ok(self.driver(attribute)?.all(record, allowed_locales))
    }

    pub fn set_translation(
        &self,
        record: &mut dyn Record,
        attribute: &str,
        locale: &str,
        value: Value,
    ) -> Result<()> {
        self.driver(attribute)?.set(record, locale, value)
    }

    pub fn set_translations(
        &self,
        record: &mut dyn Record,
        attribute: &str,
        translations: LocaleMap,
    ) -> Result<()> {
        self.driver(attribute)?.set_many(record, translations)
    }

    pub fn replace_translations(
        &self,
        record: &mut dyn Record,
        attribute: &str,
        translations: LocaleMap,
    ) -> Result<()> {
        self.driver(attribute)?.replace(record, translations)
    }

    pub fn forget_translation(&self, record: &mut dyn Record, attribute: &str, locale: &str) -> Result<()> {
        self.driver(attribute)?.forget(record, locale)
    }

    pub fn forget_all_translations(
        &self,
        record: &mut dyn Record,
        attribute: &str,
        as_null: bool,
    ) -> Result<()> {
        self.driver(attribute)?.forget_all(record, as_null)
    }

    /// Forget one locale on every translatable attribute
    pub fn forget_locale(&self, record: &mut dyn Record, locale: &str) -> Result<()> {
        for (_, driver) in &self.bindings {
            driver.forget(record, locale)?;
        }
        Ok(())
    }

    pub fn has_translation(&self, record: &dyn Record, attribute: &str, locale: &str) -> Result<bool> {
        Ok(self.driver(attribute)?.has(record, locale))
    }

    pub fn translated_locales(&self, record: &dyn Record, attribute: &str) -> Result<Vec<String>> {
        Ok(self.driver(attribute)?.translated_locales(record))
    }

    /// Every attribute's translations, keyed by attribute name
    pub fn all_translations(&self, record: &dyn Record) -> Map<String, Value> {
        self.bindings
            .iter()
            .map(|(name, driver)| (name.clone(), Value::Object(driver.all(record, None))))
            .collect()
    }

    /// Union of translated locales across attributes, first-seen order
    pub fn all_translated_locales(&self, record: &dyn Record) -> Vec<String> {
        let mut locales: Vec<String> = Vec::new();
        for (_, driver) in &self.bindings {
            for locale in driver.translated_locales(record) {
                if !locales.contains(&locale) {
                    locales.push(locale);
                }
            }
        }
        locales
    }

    /// Predicate selecting records translated into `locale`
    pub fn where_locale(&self, attribute: &str, locale: &str) -> Result<Predicate> {
        Ok(self.driver(attribute)?.locale_predicate(locale))
    }

    /// Predicate selecting records translated into any of `locales`
    pub fn where_locales(&self, attribute: &str, locales: &[&str]) -> Result<Predicate> {
        Ok(self.driver(attribute)?.any_locale_predicate(locales))
    }
}
