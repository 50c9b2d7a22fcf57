//! Error types for pidinst-core

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for model operations
pub type Result<T> = std::result::Result<T, PidInstError>;

/// Stable classification of a validation failure.
///
/// Callers branch on the kind rather than on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    MissingField,
    TypeMismatch,
    EmptyValue,
    OutOfRange,
    InvalidEnumValue,
    InvalidFormat,
    AlreadySet,
    UnknownField,
    ReadOnly,
}

/// Validation failure raised by a constructor, setter or mutator.
///
/// `field` is the human label of the offending attribute, e.g. "Owner name".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PidInstError {
    /// A mandatory attribute was not supplied
    #[error("{field} is required")]
    MissingField { field: String },

    /// A supplied value is not of the expected entity or primitive type
    #[error("{field} must be {expected}")]
    TypeMismatch { field: String, expected: String },

    /// A string required to be non-empty was empty
    #[error("{field} cannot be an empty string")]
    EmptyValue { field: String },

    /// A string reached its maximum length
    #[error("{field} must be less than {max} chars")]
    OutOfRange { field: String, max: usize },

    /// A token is not a member of its controlled vocabulary
    #[error("{field} not recognised: '{value}' is not in the {vocabulary} vocabulary")]
    InvalidEnumValue {
        field: String,
        value: String,
        vocabulary: String,
    },

    /// A value does not have the required shape
    #[error("{field} {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A write-once attribute already holds a value
    #[error("This {entity} record already has an {field} allocated")]
    AlreadySet { entity: String, field: String },

    /// The entity has no attribute with this name
    #[error("{entity} has no field named '{field}'")]
    UnknownField { entity: String, field: String },

    /// The attribute is a constant and cannot be written
    #[error("{entity} {field} is read-only")]
    ReadOnly { entity: String, field: String },
}

impl PidInstError {
    /// The stable kind of this failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PidInstError::MissingField { .. } => ErrorKind::MissingField,
            PidInstError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            PidInstError::EmptyValue { .. } => ErrorKind::EmptyValue,
            PidInstError::OutOfRange { .. } => ErrorKind::OutOfRange,
            PidInstError::InvalidEnumValue { .. } => ErrorKind::InvalidEnumValue,
            PidInstError::InvalidFormat { .. } => ErrorKind::InvalidFormat,
            PidInstError::AlreadySet { .. } => ErrorKind::AlreadySet,
            PidInstError::UnknownField { .. } => ErrorKind::UnknownField,
            PidInstError::ReadOnly { .. } => ErrorKind::ReadOnly,
        }
    }

    /// Label of the attribute that failed validation.
    pub fn field(&self) -> &str {
        match self {
            PidInstError::MissingField { field }
            | PidInstError::TypeMismatch { field, .. }
            | PidInstError::EmptyValue { field }
            | PidInstError::OutOfRange { field, .. }
            | PidInstError::InvalidEnumValue { field, .. }
            | PidInstError::InvalidFormat { field, .. }
            | PidInstError::AlreadySet { field, .. }
            | PidInstError::UnknownField { field, .. }
            | PidInstError::ReadOnly { field, .. } => field,
        }
    }

    pub(crate) fn missing(field: &str) -> Self {
        PidInstError::MissingField {
            field: field.to_string(),
        }
    }

    pub(crate) fn mismatch(field: &str, expected: impl Into<String>) -> Self {
        PidInstError::TypeMismatch {
            field: field.to_string(),
            expected: expected.into(),
        }
    }

    pub(crate) fn unknown(entity: &str, field: &str) -> Self {
        PidInstError::UnknownField {
            entity: entity.to_string(),
            field: field.to_string(),
        }
    }
}

/// Vocabulary configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// TOML parse error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File extension is neither .toml nor .json
    #[error("Unsupported vocabulary file format: {0}")]
    UnsupportedFormat(String),

    /// A vocabulary has no tokens
    #[error("Vocabulary '{0}' is empty")]
    EmptyVocabulary(String),

    /// A vocabulary contains an empty or whitespace-padded token
    #[error("Vocabulary '{vocabulary}' contains an invalid token: {token:?}")]
    InvalidToken { vocabulary: String, token: String },

    /// Vocabularies were already installed or already read
    #[error("Vocabularies are already installed for this process")]
    AlreadyInstalled,
}
