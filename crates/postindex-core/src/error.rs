//! Error types and exit codes for postindex
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure
//! - 2: Usage error (bad flags/args, invalid configuration values)
//! - 3: Data error (missing content root, invalid metadata)

mod macros;

use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data error - missing content root, unreadable index (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur during postindex operations
#[derive(Error, Debug)]
pub enum PostIndexError {
    // Usage errors (exit code 2)
    #[error("unknown format: {0} (expected: human or json)")]
    UnknownFormat(String),

    #[error("{0}")]
    UsageError(String),

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    // Data errors (exit code 3)
    #[error("content root not found: {path:?}")]
    ContentRootNotFound { path: PathBuf },

    #[error("invalid metadata in {path:?}: {reason}")]
    InvalidMetadata { path: PathBuf, reason: String },

    #[error("{context} not found: {value}")]
    NotFound { context: String, value: String },

    #[error("{context} already exists: {value}")]
    AlreadyExists { context: String, value: String },

    // Generic failures (exit code 1)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to {operation}: {reason}")]
    FailedOperation { operation: String, reason: String },

    #[error("failed to {operation} {target}: {reason}")]
    FailedOperationWithTarget {
        operation: String,
        target: String,
        reason: String,
    },

    #[error("{0}")]
    Other(String),

    #[error("Build interrupted. Run `postindex build` to resume.")]
    Interrupted,
}

impl PostIndexError {
    /// Create an error for a failed IO operation with context
    pub fn io_operation(
        operation: &str,
        path: impl std::fmt::Display,
        error: impl std::fmt::Display,
    ) -> Self {
        PostIndexError::FailedOperationWithTarget {
            operation: operation.to_string(),
            target: path.to_string(),
            reason: error.to_string(),
        }
    }

    /// Create an error for an invalid value or configuration
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        PostIndexError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for an entity that already exists
    pub fn already_exists(context: &str, value: impl std::fmt::Display) -> Self {
        PostIndexError::AlreadyExists {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for an entity that was not found
    pub fn not_found(context: &str, value: impl std::fmt::Display) -> Self {
        PostIndexError::NotFound {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            PostIndexError::UnknownFormat(_)
            | PostIndexError::UsageError(_)
            | PostIndexError::InvalidValue { .. } => ExitCode::Usage,

            PostIndexError::ContentRootNotFound { .. }
            | PostIndexError::InvalidMetadata { .. }
            | PostIndexError::NotFound { .. }
            | PostIndexError::AlreadyExists { .. } => ExitCode::Data,

            PostIndexError::Io(_)
            | PostIndexError::Yaml(_)
            | PostIndexError::Json(_)
            | PostIndexError::Toml(_)
            | PostIndexError::FailedOperation { .. }
            | PostIndexError::FailedOperationWithTarget { .. }
            | PostIndexError::Other(_)
            | PostIndexError::Interrupted => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    fn error_type(&self) -> &'static str {
        match self {
            PostIndexError::UnknownFormat(_) => "unknown_format",
            PostIndexError::UsageError(_) => "usage_error",
            PostIndexError::InvalidValue { .. } => "invalid_value",
            PostIndexError::ContentRootNotFound { .. } => "content_root_not_found",
            PostIndexError::InvalidMetadata { .. } => "invalid_metadata",
            PostIndexError::NotFound { .. } => "not_found",
            PostIndexError::AlreadyExists { .. } => "already_exists",
            PostIndexError::Io(_) => "io_error",
            PostIndexError::Yaml(_) => "yaml_error",
            PostIndexError::Json(_) => "json_error",
            PostIndexError::Toml(_) => "toml_error",
            PostIndexError::FailedOperation { .. } => "failed_operation",
            PostIndexError::FailedOperationWithTarget { .. } => "failed_operation_with_target",
            PostIndexError::Other(_) => "other",
            PostIndexError::Interrupted => "interrupted",
        }
    }

    /// Convert error to JSON representation for structured error output
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

/// Result type alias for postindex operations
pub type Result<T> = std::result::Result<T, PostIndexError>;
