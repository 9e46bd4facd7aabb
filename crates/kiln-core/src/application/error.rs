//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::TemplateError;
use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// No template source is available for a key.
    #[error("template not found: {key}")]
    TemplateNotFound { key: String },

    /// A template failed to render.
    #[error("template {template}: {source}")]
    Rendering {
        template: String,
        #[source]
        source: TemplateError,
    },

    /// Filesystem operation failed.
    #[error("filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// An artifact already exists and the overwrite policy forbids replacing it.
    #[error("{path} already exists")]
    ArtifactExists { path: PathBuf },

    /// The external formatter could not run or reported failure.
    #[error("formatter '{program}' failed: {reason}")]
    FormatterFailed { program: String, reason: String },

    /// Store access failed (lock poisoned, etc.).
    #[error("template store error")]
    StoreLockError,
}

impl ApplicationError {
    pub fn filesystem(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::FilesystemError {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::TemplateNotFound { key } => vec![
                format!("No built-in or custom template for '{}'", key),
                "Try: kiln list to see available templates".into(),
                "Check the templates.dir setting".into(),
            ],
            Self::Rendering { source, .. } => match source {
                TemplateError::MissingVariable { name, .. } => vec![
                    format!("The template refers to '{}' which is never provided", name),
                    "Check custom templates in your templates directory".into(),
                ],
                _ => vec![
                    "A template has an unterminated or mismatched block".into(),
                    "Check custom templates in your templates directory".into(),
                ],
            },
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::ArtifactExists { path } => vec![
                format!("File already exists: {}", path.display()),
                "Use --overwrite always to replace it (destructive)".into(),
                "Or --overwrite skip to keep existing files".into(),
            ],
            Self::FormatterFailed { program, .. } => vec![
                format!("Is '{}' installed and on PATH?", program),
                "Use --no-format to skip formatting".into(),
            ],
            Self::StoreLockError => vec![
                "The template store is locked".into(),
                "Try again in a moment".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TemplateNotFound { .. } => ErrorCategory::NotFound,
            Self::Rendering { .. } => ErrorCategory::Template,
            Self::ArtifactExists { .. } => ErrorCategory::Conflict,
            Self::FilesystemError { .. }
            | Self::FormatterFailed { .. }
            | Self::StoreLockError => ErrorCategory::Internal,
        }
    }
}
