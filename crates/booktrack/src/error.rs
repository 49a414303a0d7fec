use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// A single rejected input value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Wire name of the offending field (e.g. `currentPage`).
    pub field: String,
    pub reason: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.reason)
    }
}

/// Every failure found while validating one input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|e| e.field.as_str())
    }

    /// Returns the failure for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join("; "))
    }
}

#[derive(Error, Debug)]
pub enum BookError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Book not found: {0}")]
    NotFound(Uuid),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl BookError {
    /// Shorthand for a validation failure on a single field.
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        BookError::Validation(ValidationErrors(vec![FieldError::new(field, reason)]))
    }

    /// The field failures carried by a validation error.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            BookError::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    /// True for failures raised by the storage layer rather than the core.
    pub fn is_repository_error(&self) -> bool {
        matches!(
            self,
            BookError::Io(_) | BookError::Serialization(_) | BookError::Store(_)
        )
    }
}

impl From<Vec<FieldError>> for BookError {
    fn from(errors: Vec<FieldError>) -> Self {
        BookError::Validation(ValidationErrors(errors))
    }
}

pub type Result<T> = std::result::Result<T, BookError>;
