//! Custom error types
//!
//! Session-level errors live here. Failures that only affect one case are
//! recorded in [`crate::models::CaseFailure`] and never surface as a
//! [`GradeError`].

use crate::config::ConfigError;

/// Crate-wide error type
#[derive(Debug, thiserror::Error)]
pub enum GradeError {
    /// Source extension has no toolchain; no case can run
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Case directory error: {0}")]
    CaseDirectory(String),

    #[error("Case not found: {0}")]
    CaseNotFound(u64),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl GradeError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedLanguage(_) => "UNSUPPORTED_LANGUAGE",
            Self::CaseDirectory(_) => "CASE_DIRECTORY_ERROR",
            Self::CaseNotFound(_) => "CASE_NOT_FOUND",
            Self::Io(_) => "IO_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Result type alias using GradeError
pub type GradeResult<T> = Result<T, GradeError>;
