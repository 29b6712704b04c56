//! Error types module
//!
//! This module provides the core error types used throughout docqa.
//! All errors are unified under the `AppError` enum, which covers authentication,
//! authorization, upload validation, document extraction, the answering model and
//! persistence failures.
//!
//! The `Database` variant and `From<sqlx::Error>` are gated behind the `sqlx` feature.
//! With `default-features = false` the variant carries a plain message instead.

use std::io;

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for failures caused by a collaborator we do not control
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
/// This trait allows errors to self-describe their HTTP response characteristics
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "DATABASE_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    #[error("Registry error: {0}")]
    Registry(String),

    #[error("Missing token: {0}")]
    MissingToken(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No file uploaded")]
    MissingFile,

    #[error("No question provided")]
    MissingQuestion,

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Extraction failed: {message}")]
    ExtractionFailed {
        message: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Upstream model error: {0}")]
    Upstream(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::InvalidInput(format!("Validation error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
/// client_message stays per-variant for dynamic content.
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::Database(_) => (
            500,
            "DATABASE_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::Registry(_) => (
            500,
            "REGISTRY_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::MissingToken(_) => (
            401,
            "MISSING_TOKEN",
            false,
            Some("Send an 'Authorization: Bearer <token>' header obtained from /login"),
            false,
            LogLevel::Debug,
        ),
        AppError::InvalidToken(_) => (
            401,
            "INVALID_TOKEN",
            false,
            Some("Log in again to obtain a fresh token"),
            false,
            LogLevel::Debug,
        ),
        AppError::Forbidden(_) => (
            403,
            "FORBIDDEN",
            false,
            Some("Ask an administrator for a role with access to this operation"),
            false,
            LogLevel::Debug,
        ),
        AppError::InvalidInput(_) => (
            400,
            "INVALID_INPUT",
            false,
            Some("Check request parameters and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::MissingFile => (
            400,
            "MISSING_FILE",
            false,
            Some("Attach the document as a multipart field named 'document'"),
            false,
            LogLevel::Debug,
        ),
        AppError::MissingQuestion => (
            400,
            "MISSING_QUESTION",
            false,
            Some("Pass the question as the 'question' query parameter"),
            false,
            LogLevel::Debug,
        ),
        AppError::UnsupportedFormat(_) => (
            400,
            "UNSUPPORTED_FORMAT",
            false,
            Some("Upload a .txt or .pdf file"),
            false,
            LogLevel::Debug,
        ),
        AppError::ExtractionFailed { .. } => (
            400,
            "EXTRACTION_FAILED",
            false,
            Some("Check that the document is not corrupt and try a different file"),
            false,
            LogLevel::Warn,
        ),
        AppError::Upstream(_) => (
            500,
            "UPSTREAM_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Warn,
        ),
        AppError::NotFound(_) => (
            404,
            "NOT_FOUND",
            false,
            Some("Verify the resource exists"),
            false,
            LogLevel::Debug,
        ),
        AppError::Duplicate(_) => (
            500,
            "DUPLICATE",
            false,
            Some("Choose a different username"),
            false,
            LogLevel::Debug,
        ),
        AppError::UserNotFound(_) => (
            400,
            "USER_NOT_FOUND",
            false,
            Some("Check the username or register first"),
            false,
            LogLevel::Debug,
        ),
        AppError::InvalidCredentials(_) => (
            400,
            "INVALID_CREDENTIALS",
            false,
            Some("Check the password and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::Internal(_) => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::Database(_) => "Database",
            AppError::Registry(_) => "Registry",
            AppError::MissingToken(_) => "Authentication",
            AppError::InvalidToken(_) => "Authentication",
            AppError::Forbidden(_) => "Authorization",
            AppError::InvalidInput(_) => "Validation",
            AppError::MissingFile => "Validation",
            AppError::MissingQuestion => "Validation",
            AppError::UnsupportedFormat(_) => "Validation",
            AppError::ExtractionFailed { .. } => "Extraction",
            AppError::Upstream(_) => "Upstream",
            AppError::NotFound(_) => "NotFound",
            AppError::Duplicate(_) => "Duplicate",
            AppError::UserNotFound(_) => "Authentication",
            AppError::InvalidCredentials(_) => "Authentication",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Database(_) => "Failed to access database".to_string(),
            AppError::Registry(_) => "Failed to record file metadata".to_string(),
            AppError::MissingToken(ref msg) => msg.clone(),
            AppError::InvalidToken(_) => "Invalid token".to_string(),
            AppError::Forbidden(_) => "Access denied: insufficient permissions".to_string(),
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::MissingFile => "No file uploaded".to_string(),
            AppError::MissingQuestion => "Please provide a question".to_string(),
            AppError::UnsupportedFormat(_) => {
                "Invalid file format, only .pdf or .txt allowed".to_string()
            }
            AppError::ExtractionFailed { ref message, .. } => message.clone(),
            AppError::Upstream(_) => "Error processing file".to_string(),
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::Duplicate(ref msg) => msg.clone(),
            AppError::UserNotFound(_) => "User not found".to_string(),
            AppError::InvalidCredentials(_) => "Invalid password".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::InternalWithSource { .. } => "Internal server error".to_string(),
        }
    }
}
