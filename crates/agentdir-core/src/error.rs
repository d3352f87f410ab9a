//! Error taxonomy for directory validation.

use std::path::PathBuf;

/// Constraint a field value failed to satisfy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaViolation {
    #[error("field required")]
    Missing,

    #[error("extra fields not permitted")]
    UnknownField,

    #[error("expected {expected}")]
    InvalidType { expected: &'static str },

    #[error("must be at least {min} characters")]
    TooShort { min: usize },

    #[error("must be at most {max} characters")]
    TooLong { max: usize },

    #[error("must match {pattern}")]
    Pattern { pattern: &'static str },

    #[error("must be one of: {}", allowed.join(", "))]
    NotOneOf { allowed: &'static [&'static str] },

    #[error("must be an absolute http(s) URL")]
    InvalidUrl,

    #[error("must be a YYYY-MM-DD date")]
    InvalidDate,
}

/// Errors produced while loading and validating a single record file.
///
/// The variants separate malformed files (`Syntax`, `Structure`) from
/// semantically invalid records (`Schema`).
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("YAML syntax error: {0}")]
    Syntax(String),

    #[error("{reason}")]
    Structure { reason: String },

    #[error("Validation error: {field}: {violation}")]
    Schema {
        field: String,
        violation: SchemaViolation,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ValidationError {
    pub(crate) fn schema(field: impl Into<String>, violation: SchemaViolation) -> Self {
        ValidationError::Schema {
            field: field.into(),
            violation,
        }
    }

    pub(crate) fn empty() -> Self {
        ValidationError::Structure {
            reason: "Empty YAML file".to_string(),
        }
    }

    pub(crate) fn not_mapping(found: &str) -> Self {
        ValidationError::Structure {
            reason: format!("YAML content must be a mapping (found {found})"),
        }
    }

    /// Field path for schema errors.
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::Schema { field, .. } => Some(field),
            _ => None,
        }
    }

    pub fn is_schema(&self) -> bool {
        matches!(self, ValidationError::Schema { .. })
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self, ValidationError::Syntax(_))
    }

    pub fn is_structure(&self) -> bool {
        matches!(self, ValidationError::Structure { .. })
    }
}

/// Caller usage mistakes detected before any file is checked.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("data directory not found: {}", .0.display())]
    DataRootMissing(PathBuf),

    #[error("Path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Path outside data directory: {}", .0.display())]
    OutsideDataRoot(PathBuf),
}

/// Result type for single-record validation.
pub type Result<T> = std::result::Result<T, ValidationError>;
