/*!
 * Translatable attribute declarations.
 *
 * These structures are classified once, when configuration is built or
 * deserialized, and never re-inspected per call:
 * - `AttributePath`: a column plus optional nested JSON keys (`meta->title`)
 * - `AttributeConfig`: implicit (defaults) or explicit (driver + options)
 * - `ModelSchema`: everything a record type declares about its translations
 */

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::errors::{Result, TranslatableError};

/// Separator used by the textual form of nested attribute paths
pub const PATH_SEPARATOR: &str = "->";

/// Structured address of a translatable attribute
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AttributePath {
    /// Physical column holding the value
    column: String,
    /// Keys walked inside the column's JSON document
    segments: Vec<String>,
}

impl AttributePath {
    /// Parse `column` or `column->key->...`
    pub fn parse(raw: &str) -> Result<Self> {
        let mut parts = raw.split(PATH_SEPARATOR).map(str::trim);

        let column = match parts.next() {
            Some(column) if !column.is_empty() => column.to_string(),
            _ => return Err(TranslatableError::InvalidAttributePath(raw.to_string())),
        };

        let mut segments = Vec::new();
        for part in parts {
            if part.is_empty() {
                return Err(TranslatableError::InvalidAttributePath(raw.to_string()));
            }
            segments.push(part.to_string());
        }

        Ok(Self { column, segments })
    }

    /// Plain, non-nested attribute stored in its own column
    pub fn column_only(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            segments: Vec::new(),
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_nested(&self) -> bool {
        !self.segments.is_empty()
    }

    /// Logical attribute name, e.g. `meta->title`
    pub fn name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column)?;
        for segment in &self.segments {
            write!(f, "{}{}", PATH_SEPARATOR, segment)?;
        }
        Ok(())
    }
}

impl FromStr for AttributePath {
    type Err = TranslatableError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AttributePath {
    type Error = TranslatableError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<AttributePath> for String {
    fn from(path: AttributePath) -> Self {
        path.to_string()
    }
}

/// Options handed to a driver constructor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriverOptions {
    /// Shared JSON column; falls back to `Config::shared_column`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_column: Option<String>,

    /// Base locale; falls back to `Config::base_locale`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_locale: Option<String>,

    /// Hybrid only: keep a copy of the base locale in the shared column too
    #[serde(default)]
    pub force_base_duplicate: bool,

    /// Anything else, for custom drivers
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DriverOptions {
    pub fn with_storage_column(mut self, column: impl Into<String>) -> Self {
        self.storage_column = Some(column.into());
        self
    }

    pub fn with_base_locale(mut self, locale: impl Into<String>) -> Self {
        self.base_locale = Some(locale.into());
        self
    }

    pub fn with_force_base_duplicate(mut self, force: bool) -> Self {
        self.force_base_duplicate = force;
        self
    }
}

/// Per-attribute translation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawAttributeConfig", into = "RawAttributeConfig")]
pub enum AttributeConfig {
    /// Declared by name only: cast mapping or the `json` driver, default options
    Implicit(AttributePath),
    /// Declared with an explicit driver and/or options
    Explicit {
        attribute: AttributePath,
        driver: Option<String>,
        options: DriverOptions,
    },
}

impl AttributeConfig {
    /// Parse an implicit declaration from its textual path
    pub fn implicit(path: &str) -> Result<Self> {
        Ok(Self::Implicit(AttributePath::parse(path)?))
    }

    /// Explicit declaration bound to a named driver
    pub fn explicit(path: &str, driver: &str, options: DriverOptions) -> Result<Self> {
        Ok(Self::Explicit {
            attribute: AttributePath::parse(path)?,
            driver: Some(driver.to_string()),
            options,
        })
    }

    pub fn attribute(&self) -> &AttributePath {
        match self {
            Self::Implicit(attribute) => attribute,
            Self::Explicit { attribute, .. } => attribute,
        }
    }

    /// Driver named in the declaration, if any
    pub fn driver(&self) -> Option<&str> {
        match self {
            Self::Implicit(_) => None,
            Self::Explicit { driver, .. } => driver.as_deref(),
        }
    }

    /// Options for the driver; implicit declarations use the defaults
    pub fn options(&self) -> DriverOptions {
        match self {
            Self::Implicit(_) => DriverOptions::default(),
            Self::Explicit { options, .. } => options.clone(),
        }
    }
}

/// Wire form: a bare string or an object with `name`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawAttributeConfig {
    Name(AttributePath),
    Detailed {
        name: AttributePath,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        driver: Option<String>,
        #[serde(flatten)]
        options: DriverOptions,
    },
}

impl From<RawAttributeConfig> for AttributeConfig {
    fn from(raw: RawAttributeConfig) -> Self {
        match raw {
            RawAttributeConfig::Name(attribute) => Self::Implicit(attribute),
            RawAttributeConfig::Detailed {
                name,
                driver,
                options,
            } => Self::Explicit {
                attribute: name,
                driver,
                options,
            },
        }
    }
}

impl From<AttributeConfig> for RawAttributeConfig {
    fn from(config: AttributeConfig) -> Self {
        match config {
            AttributeConfig::Implicit(attribute) => Self::Name(attribute),
            AttributeConfig::Explicit {
                attribute,
                driver,
                options,
            } => Self::Detailed {
                name: attribute,
                driver,
                options,
            },
        }
    }
}

/// Translation declarations of one record type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelSchema {
    /// Record type name; part of the driver cache key
    pub record_type: String,

    /// Declared translatable attributes
    #[serde(default)]
    pub attributes: Vec<AttributeConfig>,

    /// Cast identifiers by attribute name
    #[serde(default)]
    pub casts: HashMap<String, String>,
}

impl ModelSchema {
    pub fn new(record_type: impl Into<String>) -> Self {
        Self {
            record_type: record_type.into(),
            attributes: Vec::new(),
            casts: HashMap::new(),
        }
    }

    /// Declare an implicit translatable attribute
    pub fn translatable(self, path: &str) -> Result<Self> {
        Ok(self.with_attribute(AttributeConfig::implicit(path)?))
    }

    pub fn with_attribute(mut self, config: AttributeConfig) -> Self {
        self.attributes.push(config);
        self
    }

    /// Declare a cast for an attribute
    pub fn with_cast(mut self, attribute: impl Into<String>, cast: impl Into<String>) -> Self {
        self.casts.insert(attribute.into(), cast.into());
        self
    }

    pub fn cast_for(&self, attribute: &AttributePath) -> Option<&str> {
        self.casts.get(&attribute.name()).map(String::as_str)
    }

    pub fn attribute_config(&self, name: &str) -> Option<&AttributeConfig> {
        self.attributes
            .iter()
            .find(|config| config.attribute().name() == name)
    }
}
