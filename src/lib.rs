/*!
 * # polyglot-columns - Multilingual attributes for persisted records
 *
 * A Rust library that lets one logical record attribute hold a value per
 * locale, with a per-attribute choice of storage layout.
 *
 * ## Features
 *
 * - Three storage layouts behind one driver contract:
 *   - `json`: `{locale: value}` in the attribute's own JSON column
 *     (nested paths such as `meta->title` supported)
 *   - `hybrid`: base locale in a plain column, other locales in a shared
 *     JSON column keyed `locale -> attribute`
 *   - `extra_only`: every locale in the shared JSON column
 * - Locale fallback (record fallback, configured fallback, any locale)
 * - Null / empty-string retention policy
 * - Query predicates for "has a translation in locale L", with an SQL renderer
 * - Custom layouts registered by name without touching the built-ins
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Package-wide configuration
 * - `attribute`: Attribute paths, per-attribute configuration, model schemas
 * - `codec`: JSON column decoding and encoding
 * - `drivers`: The driver contract and its layouts:
 *   - `drivers::base`: Fallback, filtering, hooks and events shared by layouts
 *   - `drivers::json`, `drivers::hybrid`, `drivers::extra_only`
 * - `registry`: Driver lookup, cast mappings and the instance cache
 * - `translatable`: The per-record attribute dispatcher
 * - `record`: The record attribute-bag contract
 * - `events`: Translation notifications
 * - `query`: Locale predicates and their SQL rendering
 * - `errors`: Custom error types
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod attribute;
pub mod codec;
pub mod drivers;
pub mod errors;
pub mod events;
pub mod query;
pub mod record;
pub mod registry;
pub mod translatable;

// Re-export main types for easier usage
pub use app_config::Config;
pub use attribute::{AttributeConfig, AttributePath, DriverOptions, ModelSchema};
pub use codec::LocaleMap;
pub use drivers::{DriverInit, DriverSettings, TranslationDriver};
pub use errors::{Result, TranslatableError};
pub use events::{CollectingSink, EventSink, TranslationSet};
pub use query::{ColumnPath, Predicate};
pub use record::{AttributeBag, Record};
pub use registry::DriverRegistry;
pub use translatable::TranslatableAttributes;
