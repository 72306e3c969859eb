/*!
 * SQL rendering of locale predicates.
 *
 * Only the two shapes drivers emit are supported: "JSON path is not null"
 * and an OR of those.
 */

use std::fmt::Write;

use super::predicate::{ColumnPath, Predicate};
use crate::app_config::is_valid_identifier;
use crate::errors::{Result, TranslatableError};

/// Target SQL dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SqlDialect {
    /// SQLite JSON1 `json_extract`
    #[default]
    Sqlite,
    /// PostgreSQL `->` / `->>` operators on json/jsonb columns
    Postgres,
}

/// Render a predicate as an SQL boolean expression
pub fn render(predicate: &Predicate, dialect: SqlDialect) -> Result<String> {
    let mut out = String::new();
    render_into(&mut out, predicate, dialect)?;
    Ok(out)
}

fn render_into(out: &mut String, predicate: &Predicate, dialect: SqlDialect) -> Result<()> {
    match predicate {
        Predicate::NotNull(path) => {
            out.push_str(&render_path(path, dialect)?);
            out.push_str(" IS NOT NULL");
        }
        Predicate::Or(predicates) if predicates.is_empty() => out.push_str("1 = 0"),
        Predicate::Or(predicates) => {
            out.push('(');
            for (i, inner) in predicates.iter().enumerate() {
                if i > 0 {
                    out.push_str(" OR ");
                }
                render_into(out, inner, dialect)?;
            }
            out.push(')');
        }
    }
    Ok(())
}

fn render_path(path: &ColumnPath, dialect: SqlDialect) -> Result<String> {
    if !is_valid_identifier(&path.column) {
        return Err(TranslatableError::InvalidIdentifier(path.column.clone()));
    }
    let column = format!("\"{}\"", path.column);

    if path.path.is_empty() {
        return Ok(column);
    }

    match dialect {
        SqlDialect::Sqlite => {
            let mut json_path = String::from("$");
            for key in &path.path {
                if key.contains('"') {
                    return Err(TranslatableError::InvalidIdentifier(key.clone()));
                }
                // Infallible for String targets.
                let _ = write!(json_path, ".\"{}\"", key);
            }
            Ok(format!("json_extract({}, {})", column, quote_literal(&json_path)))
        }
        SqlDialect::Postgres => {
            let mut expr = column;
            let last = path.path.len() - 1;
            for (i, key) in path.path.iter().enumerate() {
                let op = if i == last { "->>" } else { "->" };
                let _ = write!(expr, "{}{}", op, quote_literal(key));
            }
            Ok(expr)
        }
    }
}

fn quote_literal(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}
