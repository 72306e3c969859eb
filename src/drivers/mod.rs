/*!
 * Translation drivers for the supported storage layouts.
 *
 * This module contains one implementation per physical layout:
 * - `json`: every locale in the attribute's own JSON column (nested paths allowed)
 * - `hybrid`: base locale in a plain column, other locales in a shared JSON column
 * - `extra_only`: every locale in a shared JSON column
 *
 * `base::DriverCore` carries the behaviour they share (fallback resolution,
 * value filtering, the missing-translation hook and event emission).
 */

use serde_json::Value;
use std::fmt::Debug;

use crate::attribute::AttributePath;
use crate::codec::LocaleMap;
use crate::errors::Result;
use crate::query::Predicate;
use crate::record::Record;

pub mod base;
pub mod extra_only;
pub mod hybrid;
pub mod json;
pub mod shared_column;

pub use base::{DriverCore, DriverInit, DriverSettings, MissingTranslation, MissingTranslationHook};
pub use extra_only::ExtraOnlyColumnDriver;
pub use hybrid::HybridColumnDriver;
pub use json::JsonColumnDriver;

/// Registry name of the JSON column layout
pub const JSON_DRIVER: &str = "json";
/// Registry name of the hybrid layout
pub const HYBRID_DRIVER: &str = "hybrid";
/// Registry name of the extra-only layout
pub const EXTRA_ONLY_DRIVER: &str = "extra_only";

/// Cast identifier implying the JSON layout
pub const JSON_CAST: &str = "translatable_json";
/// Cast identifier implying the hybrid layout
pub const HYBRID_CAST: &str = "translatable_hybrid";
/// Cast identifier implying the extra-only layout
pub const EXTRA_ONLY_CAST: &str = "translatable_extra_only";

/// Common trait for all storage layouts
///
/// One instance serves every record of a type for one attribute, so
/// implementations keep no per-record state: everything lives in the record's
/// attribute bag.
pub trait TranslationDriver: Send + Sync + Debug {
    /// Registry name of the layout
    fn name(&self) -> &str;

    /// Attribute governed by this instance
    fn attribute(&self) -> &AttributePath;

    /// Read one locale.
    ///
    /// # Arguments
    /// * `record` - Record to read from
    /// * `locale` - Requested locale
    /// * `use_fallback` - Substitute another locale's value on a miss
    ///
    /// # Returns
    /// * `Option<Value>` - The value, or `None` when no translation applies
    fn get(&self, record: &dyn Record, locale: &str, use_fallback: bool) -> Option<Value>;

    /// Write one locale
    fn set(&self, record: &mut dyn Record, locale: &str, value: Value) -> Result<()>;

    /// Remove one locale; removing an absent locale is a no-op
    fn forget(&self, record: &mut dyn Record, locale: &str) -> Result<()>;

    /// Remove every locale of the attribute
    ///
    /// # Arguments
    /// * `as_null` - Blank the storage to `null` rather than an empty value
    fn forget_all(&self, record: &mut dyn Record, as_null: bool) -> Result<()>;

    /// Every stored translation, filtered by the retention policy and
    /// optionally restricted to `allowed_locales`
    fn all(&self, record: &dyn Record, allowed_locales: Option<&[&str]>) -> LocaleMap;

    /// Query predicate: "a translation for `locale` exists"
    fn locale_predicate(&self, locale: &str) -> Predicate;

    /// Write several locales in map order
    fn set_many(&self, record: &mut dyn Record, translations: LocaleMap) -> Result<()> {
        for (locale, value) in translations {
            self.set(record, &locale, value)?;
        }
        Ok(())
    }

    /// Drop every locale, then write `translations`
    ///
    /// Columns are blanked to `null` so no empty base value survives.
    fn replace(&self, record: &mut dyn Record, translations: LocaleMap) -> Result<()> {
        self.forget_all(record, true)?;
        self.set_many(record, translations)
    }

    /// Locales with a retained translation, in storage order
    fn translated_locales(&self, record: &dyn Record) -> Vec<String> {
        self.all(record, None).keys().cloned().collect()
    }

    fn has(&self, record: &dyn Record, locale: &str) -> bool {
        self.all(record, None).contains_key(locale)
    }

    /// Query predicate: "a translation exists for any of `locales`"
    fn any_locale_predicate(&self, locales: &[&str]) -> Predicate {
        Predicate::any(
            locales
                .iter()
                .map(|locale| self.locale_predicate(locale))
                .collect(),
        )
    }
}
