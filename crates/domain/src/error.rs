//! Domain error types.

use std::fmt;

use common::{AggregateId, Version};
use document_store::StoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::ValidationErrors;

/// A message scoped to one request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Request field name (e.g. "name", "attributes").
    pub field: String,

    /// Human readable message (e.g. "Name already updated").
    #[serde(rename = "error")]
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Ordered collection of field errors accumulated during one mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error for `field`.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    /// Appends every error of `other`, keeping its order.
    pub fn extend(&mut self, other: FieldErrors) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Returns true if any error is recorded for `field`.
    pub fn contains_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.0
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|(a, _), (b, _)| a.cmp(b));

        let mut result = FieldErrors::new();
        for (field, field_errors) in fields {
            for error in field_errors {
                let message = match &error.message {
                    Some(message) => message.to_string(),
                    None => format!("{} is invalid", field_label(&field)),
                };
                result.push(field.to_string(), message);
            }
        }
        result
    }
}

/// Capitalizes a field name for use in messages ("name" -> "Name").
pub(crate) fn field_label(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// The five outcomes a caller has to tell apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    ValidationFailed,
    ConcurrentModification,
    NoUpdates,
    Unexpected,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::ValidationFailed => "validation_failed",
            ErrorKind::ConcurrentModification => "concurrent_modification",
            ErrorKind::NoUpdates => "no_updates",
            ErrorKind::Unexpected => "unexpected",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Aggregate not found.
    #[error("{aggregate_type} with ID {aggregate_id} not found")]
    NotFound {
        aggregate_type: &'static str,
        aggregate_id: AggregateId,
    },

    /// Request rejected with one or more field-scoped errors.
    #[error("Validation failed: {0}")]
    ValidationFailed(FieldErrors),

    /// The caller's expected version no longer matches the stored one.
    #[error(
        "Concurrent modification of {aggregate_type} {aggregate_id}: expected version {expected}"
    )]
    ConcurrentModification {
        aggregate_type: &'static str,
        aggregate_id: AggregateId,
        expected: Version,
    },

    /// The request carried no field to change.
    #[error("No updates")]
    NoUpdates,

    /// An error occurred in the document store.
    #[error("Document store error: {0}")]
    Store(#[from] StoreError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DomainError {
    /// Classifies the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::NotFound { .. } => ErrorKind::NotFound,
            DomainError::ValidationFailed(_) => ErrorKind::ValidationFailed,
            DomainError::ConcurrentModification { .. } => ErrorKind::ConcurrentModification,
            DomainError::NoUpdates => ErrorKind::NoUpdates,
            DomainError::Store(_) | DomainError::Serialization(_) => ErrorKind::Unexpected,
        }
    }

    /// Field-scoped errors carried by the error, if any.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            DomainError::ValidationFailed(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for DomainError {
    fn from(errors: ValidationErrors) -> Self {
        DomainError::ValidationFailed(errors.into())
    }
}
