//! Custom error types for tweetlens.
//!
//! Provides structured error handling with context for better diagnostics.

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for tweetlens operations.
#[derive(Error, Debug)]
pub enum LensError {
    // =========================================================================
    // Store Errors
    // =========================================================================
    /// Database file not found (nothing imported yet).
    #[error(
        "No tweet store found. Run 'tweetlens import <file>' first.\nExpected database at: {path}"
    )]
    StoreNotFound { path: PathBuf },

    /// Database schema version mismatch.
    #[error("Store schema version mismatch: expected {expected}, found {found}. Re-import with --force.")]
    SchemaMismatch { expected: i32, found: i32 },

    /// Database operation failed.
    #[error("Store error: {0}")]
    StoreError(#[from] rusqlite::Error),

    // =========================================================================
    // Import Errors
    // =========================================================================
    /// Failed to parse an import file.
    #[error("Failed to parse '{file}': {reason}")]
    ParseError { file: String, reason: String },

    // =========================================================================
    // Completion Errors
    // =========================================================================
    /// The ask request carried no prompt.
    #[error("Prompt is required.")]
    PromptRequired,

    /// The completion provider is not configured (missing API key).
    #[error("Completion API key not set. Export {var} before using ask.")]
    ApiKeyMissing { var: &'static str },

    /// The completion provider returned a failure.
    #[error("Completion API error ({status}): {reason}")]
    CompletionError { status: u16, reason: String },

    /// HTTP transport failure on the completion call.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    // =========================================================================
    // IO / Configuration Errors
    // =========================================================================
    /// File read/write error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration file parsing error.
    #[error("Invalid configuration in '{path}': {reason}")]
    ConfigError { path: PathBuf, reason: String },

    /// Invalid command-line argument.
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    // =========================================================================
    // Generic Errors
    // =========================================================================
    /// Wrapped anyhow error for gradual migration.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for tweetlens operations.
pub type Result<T> = std::result::Result<T, LensError>;

impl LensError {
    /// Create a store not found error.
    pub fn store_not_found(path: impl Into<PathBuf>) -> Self {
        Self::StoreNotFound { path: path.into() }
    }

    /// Create a parse error.
    pub fn parse_error(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ParseError {
            file: file.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Create a completion provider error.
    pub fn completion_error(status: u16, reason: impl Into<String>) -> Self {
        Self::CompletionError {
            status,
            reason: reason.into(),
        }
    }

    /// Check if this error is recoverable (user can fix it).
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::StoreNotFound { .. }
                | Self::PromptRequired
                | Self::ApiKeyMissing { .. }
                | Self::InvalidArgument { .. }
        )
    }

    /// Get a suggestion for how to fix this error, if applicable.
    #[must_use]
    pub const fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::StoreNotFound { .. } => {
                Some("Run 'tweetlens import <file>' to populate the store.")
            }
            Self::SchemaMismatch { .. } => {
                Some("Run 'tweetlens import --force <file>' to rebuild the store.")
            }
            Self::ApiKeyMissing { .. } => {
                Some("Export OPENAI_API_KEY before using the ask command.")
            }
            Self::PromptRequired => Some("Provide a non-empty question."),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LensError::store_not_found("/path/to/store");
        assert!(err.to_string().contains("/path/to/store"));
    }

    #[test]
    fn test_prompt_required_message() {
        assert_eq!(LensError::PromptRequired.to_string(), "Prompt is required.");
    }

    #[test]
    fn test_error_suggestions() {
        let err = LensError::store_not_found("/path/to/store");
        assert!(err.suggestion().is_some());
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_from_rusqlite_error() {
        fn accepts_lens_error(_: LensError) {}
        let sqlite_err = rusqlite::Error::InvalidQuery;
        accepts_lens_error(sqlite_err.into());
    }
}
