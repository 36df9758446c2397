//! Schema error types
//!
//! Error codes:
//! - SHAPE_TYPE_MISMATCH (REJECT)
//! - SHAPE_NON_NULLABLE (REJECT)
//! - SHAPE_UNEXPECTED_FIELD (REJECT)
//! - SHAPE_MALFORMED_SCHEMA (FATAL)
//! - SHAPE_RESOLVER_CONTRACT (FATAL)
//! - SHAPE_RESOLVER_FAILED (FATAL)
//! - SHAPE_IO_ERROR / SHAPE_JSON_ERROR (FATAL)
//!
//! Only the three REJECT kinds describe bad input. They travel to the
//! caller inside a single `ValidationError`. Everything else is a fault
//! in the schema or in caller-supplied code and is returned as its own
//! `Error` variant.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use super::types::BoxError;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Input rejected
    Reject,
    /// Programming error, not worth retrying
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// A classified data-validation failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifiedError {
    /// Value present but of the wrong kind
    #[error("field '{key_path}': expected {expected}, got {}", describe(.actual))]
    TypeMismatch {
        key_path: String,
        expected: &'static str,
        actual: Value,
    },

    /// Required value missing or null
    #[error("field '{key_path}': required value is missing or null")]
    NonNullable { key_path: String },

    /// Strict mode found an undeclared key
    #[error("field '{key_path}': unexpected field '{key}'")]
    UnexpectedField { key_path: String, key: String },
}

impl ClassifiedError {
    pub(crate) fn type_mismatch(
        key_path: impl Into<String>,
        expected: &'static str,
        actual: &Value,
    ) -> Self {
        ClassifiedError::TypeMismatch {
            key_path: key_path.into(),
            expected,
            actual: actual.clone(),
        }
    }

    pub(crate) fn non_nullable(key_path: impl Into<String>) -> Self {
        ClassifiedError::NonNullable {
            key_path: key_path.into(),
        }
    }

    pub(crate) fn unexpected_field(key_path: impl Into<String>, key: impl Into<String>) -> Self {
        ClassifiedError::UnexpectedField {
            key_path: key_path.into(),
            key: key.into(),
        }
    }

    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ClassifiedError::TypeMismatch { .. } => "SHAPE_TYPE_MISMATCH",
            ClassifiedError::NonNullable { .. } => "SHAPE_NON_NULLABLE",
            ClassifiedError::UnexpectedField { .. } => "SHAPE_UNEXPECTED_FIELD",
        }
    }

    /// Fully qualified key path of the failing field
    pub fn key_path(&self) -> &str {
        match self {
            ClassifiedError::TypeMismatch { key_path, .. }
            | ClassifiedError::NonNullable { key_path }
            | ClassifiedError::UnexpectedField { key_path, .. } => key_path,
        }
    }
}

/// The single error surfaced for bad input.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("validation failed: {cause}")]
pub struct ValidationError {
    #[source]
    cause: ClassifiedError,
}

impl ValidationError {
    pub fn new(cause: ClassifiedError) -> Self {
        Self { cause }
    }

    /// The classified failure wrapped by this error
    pub fn cause(&self) -> &ClassifiedError {
        &self.cause
    }

    pub fn into_cause(self) -> ClassifiedError {
        self.cause
    }

    pub fn key_path(&self) -> &str {
        self.cause.key_path()
    }

    pub fn code(&self) -> &'static str {
        self.cause.code()
    }
}

impl From<ClassifiedError> for ValidationError {
    fn from(cause: ClassifiedError) -> Self {
        Self::new(cause)
    }
}

/// Top-level error type
#[derive(Debug, Error)]
pub enum Error {
    /// Input does not conform to the schema
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Schema cannot be used as written
    #[error("malformed schema at '{key_path}': {reason}")]
    MalformedSchema { key_path: String, reason: String },

    /// Resolver returned a value different from the one it received
    #[error("resolver for '{key_path}' returned a different value than it received")]
    ResolverContract { key_path: String },

    /// Resolver itself failed
    #[error("resolver for '{key_path}' failed: {source}")]
    Resolver {
        key_path: String,
        #[source]
        source: BoxError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn malformed(key_path: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedSchema {
            key_path: key_path.into(),
            reason: reason.into(),
        }
    }

    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            Error::Validation(err) => err.code(),
            Error::MalformedSchema { .. } => "SHAPE_MALFORMED_SCHEMA",
            Error::ResolverContract { .. } => "SHAPE_RESOLVER_CONTRACT",
            Error::Resolver { .. } => "SHAPE_RESOLVER_FAILED",
            Error::Io(_) => "SHAPE_IO_ERROR",
            Error::Json(_) => "SHAPE_JSON_ERROR",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            Error::Validation(_) => Severity::Reject,
            _ => Severity::Fatal,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }

    /// Returns the validation failure, if this is one
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Error::Validation(err) => Some(err),
            _ => None,
        }
    }

    /// Key path the error refers to, when there is one
    pub fn key_path(&self) -> Option<&str> {
        match self {
            Error::Validation(err) => Some(err.key_path()),
            Error::MalformedSchema { key_path, .. }
            | Error::ResolverContract { key_path }
            | Error::Resolver { key_path, .. } => Some(key_path),
            Error::Io(_) | Error::Json(_) => None,
        }
    }
}

/// Result type for schema operations
pub type Result<T> = std::result::Result<T, Error>;

/// Short description of a value for error messages.
fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".into(),
        Value::Bool(b) => format!("bool {}", b),
        Value::Number(n) => format!("number {}", n),
        Value::String(s) => format!("string {:?}", s),
        Value::Array(items) => format!("array of {} elements", items.len()),
        Value::Object(_) => "object".into(),
    }
}
