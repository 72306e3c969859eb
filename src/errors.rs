/*!
 * Error types for polyglot-columns.
 *
 * Configuration and attribute-misuse problems surface as `TranslatableError`.
 * Malformed data in storage columns is never an error: it decodes to an empty
 * locale map (see `codec`).
 */

use thiserror::Error;

/// Errors raised while resolving drivers or operating on translatable attributes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslatableError {
    /// A driver name was requested that was never registered
    #[error("Unknown translation driver: {0}")]
    UnknownDriver(String),

    /// A nested attribute path was bound to a driver that cannot address it
    #[error("Driver '{driver}' does not support nested attribute path '{attribute}'")]
    NestedPathUnsupported {
        /// Name of the rejecting driver
        driver: String,
        /// Full attribute path, e.g. `meta->title`
        attribute: String,
    },

    /// An attribute path string could not be parsed
    #[error("Invalid attribute path: {0}")]
    InvalidAttributePath(String),

    /// A column name is not usable as an SQL identifier
    #[error("Invalid column identifier: {0}")]
    InvalidIdentifier(String),

    /// Package configuration is inconsistent
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The attribute was never declared translatable on the record type
    #[error("Attribute '{0}' is not translatable")]
    NotTranslatable(String),

    /// Failure reported by a custom driver
    #[error("Driver error: {0}")]
    Driver(String),
}

impl TranslatableError {
    /// Whether this error stems from static configuration rather than a call site
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownDriver(_)
                | Self::NestedPathUnsupported { .. }
                | Self::InvalidAttributePath(_)
                | Self::InvalidIdentifier(_)
                | Self::InvalidConfig(_)
        )
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, TranslatableError>;

/// Error returned by event sinks and missing-translation hooks.
///
/// Both are isolated from the driver: the error is logged and dropped.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;
