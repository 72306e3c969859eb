use serde::{Deserialize, Serialize};
use std::fmt;

/// A column, optionally followed by keys inside its JSON document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnPath {
    pub column: String,
    #[serde(default)]
    pub path: Vec<String>,
}

impl ColumnPath {
    pub fn column(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            path: Vec::new(),
        }
    }

    /// Append one key to the JSON path
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.path.push(key.into());
        self
    }

    pub fn keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.path.extend(keys.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for ColumnPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column)?;
        for key in &self.path {
            write!(f, "->{}", key)?;
        }
        Ok(())
    }
}

/// Existence predicate over translated columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// The value at the path exists and is not null
    NotNull(ColumnPath),
    /// Any of the inner predicates holds
    Or(Vec<Predicate>),
}

impl Predicate {
    pub fn not_null(path: ColumnPath) -> Self {
        Self::NotNull(path)
    }

    /// OR-composition; a single predicate is returned unwrapped
    pub fn any(mut predicates: Vec<Predicate>) -> Self {
        if predicates.len() == 1 {
            if let Some(only) = predicates.pop() {
                return only;
            }
        }
        Self::Or(predicates)
    }

    /// Feed this description to a host query builder
    pub fn apply(&self, builder: &mut dyn PredicateBuilder) {
        match self {
            Self::NotNull(path) => builder.where_not_null(path),
            Self::Or(predicates) => {
                builder.begin_any();
                for predicate in predicates {
                    predicate.apply(builder);
                }
                builder.end_any();
            }
        }
    }

    /// Every column path referenced, in order
    pub fn column_paths(&self) -> Vec<&ColumnPath> {
        match self {
            Self::NotNull(path) => vec![path],
            Self::Or(predicates) => predicates.iter().flat_map(Self::column_paths).collect(),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotNull(path) => write!(f, "{} is not null", path),
            Self::Or(predicates) => {
                write!(f, "(")?;
                for (i, predicate) in predicates.iter().enumerate() {
                    if i > 0 {
                        write!(f, " or ")?;
                    }
                    write!(f, "{}", predicate)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Host query builder receiving predicate descriptions
pub trait PredicateBuilder {
    /// Add "value at `path` is not null"
    fn where_not_null(&mut self, path: &ColumnPath);

    /// Open an OR group; following predicates until `end_any` are alternatives
    fn begin_any(&mut self);

    fn end_any(&mut self);
}
