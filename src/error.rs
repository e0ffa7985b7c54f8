//! Error types for taskrank
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad input, unknown task, invalid config)
//! - 4: Operation failed (task file unreadable or unwritable)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the taskrank CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for taskrank operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid value: {0}")]
    Validation(String),

    #[error("A task titled '{0}' already exists")]
    DuplicateTitle(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Operation failures (exit code 4)
    #[error("Task file {path}: {reason}")]
    Persistence { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl Error {
    /// Build a persistence error for `path` from any displayable cause
    pub fn persistence(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        Error::Persistence {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Validation(_)
            | Error::DuplicateTitle(_)
            | Error::TaskNotFound(_)
            | Error::InvalidArgument(_)
            | Error::InvalidConfig(_) => exit_codes::USER_ERROR,

            Error::Persistence { .. }
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Structured details for JSON error output, when the variant has any
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::Persistence { path, .. } => Some(serde_json::json!({
                "path": path.display().to_string(),
            })),
            Error::DuplicateTitle(title) | Error::TaskNotFound(title) => {
                Some(serde_json::json!({ "title": title }))
            }
            _ => None,
        }
    }
}

/// Result type alias for taskrank operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(serde::Serialize)]
pub struct JsonError {
    pub message: String,
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            message: err.to_string(),
            code: err.exit_code(),
            details: err.details(),
        }
    }
}
