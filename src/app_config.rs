/*!
 * Package-wide configuration.
 *
 * Holds the policy shared by every translation driver: locales, fallback
 * behaviour, value retention and the shared column name, plus the
 * translatable declarations of each record type.
 */

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs;
use std::path::Path;

use crate::attribute::ModelSchema;

/// Translation policy and record type declarations
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Locale used by dispatchers until one is set explicitly
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Locale stored in the plain column by the hybrid layout
    #[serde(default = "default_locale")]
    pub base_locale: String,

    /// Fallback locale used when a record does not declare its own
    #[serde(default)]
    pub fallback_locale: Option<String>,

    /// Whether dispatcher reads fall back to another locale
    #[serde(default = "default_true")]
    pub use_fallback: bool,

    /// Fall back to the first translated locale when nothing else matches
    #[serde(default)]
    pub fallback_any: bool,

    /// Keep `null` translations when enumerating
    #[serde(default)]
    pub allow_null: bool,

    /// Keep empty-string translations when enumerating
    #[serde(default)]
    pub allow_empty_string: bool,

    /// Default JSON column shared by hybrid and extra-only attributes
    #[serde(default = "default_shared_column")]
    pub shared_column: String,

    /// Record type declarations
    #[serde(default)]
    pub models: Vec<ModelSchema>,
}

/// Column names must be plain SQL identifiers
static IDENTIFIER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier pattern"));

/// Check that a column name can be emitted as an SQL identifier
pub fn is_valid_identifier(name: &str) -> bool {
    IDENTIFIER_PATTERN.is_match(name)
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_shared_column() -> String {
    "extra".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Parse a configuration from JSON text
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Config =
            serde_json::from_str(text).context("Failed to parse translatable configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Write the configuration as pretty JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), text)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.locale.trim().is_empty() {
            return Err(anyhow!("Active locale must not be empty"));
        }
        if self.base_locale.trim().is_empty() {
            return Err(anyhow!("Base locale must not be empty"));
        }
        if matches!(&self.fallback_locale, Some(locale) if locale.trim().is_empty()) {
            return Err(anyhow!("Fallback locale must not be empty when set"));
        }
        if !is_valid_identifier(&self.shared_column) {
            return Err(anyhow!("Invalid shared column name: {}", self.shared_column));
        }

        for model in &self.models {
            if model.record_type.trim().is_empty() {
                return Err(anyhow!("Model declaration without record type"));
            }
            for attribute in &model.attributes {
                let column = attribute.attribute().column();
                if !is_valid_identifier(column) {
                    return Err(anyhow!(
                        "Invalid column '{}' on model {}",
                        column,
                        model.record_type
                    ));
                }
                if let Some(storage) = &attribute.options().storage_column {
                    if !is_valid_identifier(storage) {
                        return Err(anyhow!(
                            "Invalid storage column '{}' on model {}",
                            storage,
                            model.record_type
                        ));
                    }
                }
            }
        }

        Ok(())
    }

    /// Look up the declarations of a record type
    pub fn schema(&self, record_type: &str) -> Option<&ModelSchema> {
        self.models.iter().find(|model| model.record_type == record_type)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            locale: default_locale(),
            base_locale: default_locale(),
            fallback_locale: None,
            use_fallback: default_true(),
            fallback_any: false,
            allow_null: false,
            allow_empty_string: false,
            shared_column: default_shared_column(),
            models: Vec::new(),
        }
    }
}
