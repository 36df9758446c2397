//! CLI-specific error types

use std::io;

use thiserror::Error;

use crate::schema::{self, ValidationError};

/// Failure of a CLI command. Every variant maps to exit code 1.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("options file: {0}")]
    Config(String),

    #[error("no document on input")]
    EmptyInput,

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Schema definition could not be loaded or used
    #[error(transparent)]
    Schema(schema::Error),

    /// Document failed validation
    #[error(transparent)]
    Rejected(ValidationError),
}

impl CliError {
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Config(_) => "SHAPE_CLI_CONFIG_ERROR",
            CliError::EmptyInput | CliError::Io(_) | CliError::Json(_) => "SHAPE_CLI_IO_ERROR",
            CliError::Schema(_) => "SHAPE_CLI_SCHEMA_ERROR",
            CliError::Rejected(_) => "SHAPE_CLI_REJECTED",
        }
    }
}

impl From<schema::Error> for CliError {
    fn from(e: schema::Error) -> Self {
        match e {
            schema::Error::Validation(err) => CliError::Rejected(err),
            schema::Error::Io(err) => CliError::Io(err),
            schema::Error::Json(err) => CliError::Json(err),
            other => CliError::Schema(other),
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
