/*!
 * Locale filtering predicates.
 *
 * Drivers describe "has a translation for locale L" as data; the host's
 * query builder (or the bundled SQL renderer) turns it into a real query.
 */

pub mod predicate;
pub mod sql;

pub use predicate::{ColumnPath, Predicate, PredicateBuilder};
pub use sql::{render, SqlDialect};
