// ============================================================================
// domain/error.rs - DOMAIN ERROR TAXONOMY
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (reports keep a copy of isolated failures)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (400-level equivalent)
    // ========================================================================
    #[error("invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("unknown artifact kind: {0}")]
    InvalidKind(String),

    #[error("option '{option}' is not supported for {kind} artifacts")]
    UnsupportedOption { kind: String, option: String },

    #[error("option '{option}' expects a {expected} value")]
    InvalidOptionValue {
        option: String,
        expected: &'static str,
    },

    #[error("unknown overwrite policy: {0}")]
    InvalidOverwritePolicy(String),

    // ========================================================================
    // Registry Errors
    // ========================================================================
    #[error("registry document has no {anchor} anchor; refusing to patch")]
    RegistryPatch { anchor: RegistryAnchor },
}

/// Failures raised while parsing or evaluating a template.
///
/// Produced by renderer adapters; the application layer attaches the
/// template key before surfacing it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("missing variable '{name}' (line {line})")]
    MissingVariable { name: String, line: usize },

    #[error("malformed block at line {line}: {reason}")]
    MalformedBlock { reason: String, line: usize },

    #[error("'{name}' is not a list and cannot be iterated (line {line})")]
    NotAList { name: String, line: usize },
}

/// The anchors the registry patcher relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryAnchor {
    Imports,
    EntriesArray,
}

impl std::fmt::Display for RegistryAnchor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Imports => f.write_str("import"),
            Self::EntriesArray => f.write_str("entries-array"),
        }
    }
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidName { name, .. } => vec![
                format!("'{}' cannot be turned into identifiers", name),
                "Use letters and digits only, starting with a letter".into(),
                "Examples: Invoice, orderItem, UserProfile".into(),
            ],
            Self::InvalidKind(kind) => vec![
                format!("'{}' is not an artifact kind", kind),
                "Supported kinds: component, store, service, page".into(),
            ],
            Self::UnsupportedOption { kind, option } => vec![
                format!("--{} has no effect on a {}", option, kind),
                "Try: kiln list to see the options each kind accepts".into(),
            ],
            Self::RegistryPatch { anchor } => vec![
                format!("The registry file is missing its {} anchor", anchor),
                "Add the import and the route manually".into(),
                "Or restore the file to the 'export const routes = [' convention".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidName { .. }
            | Self::InvalidKind(_)
            | Self::UnsupportedOption { .. }
            | Self::InvalidOptionValue { .. }
            | Self::InvalidOverwritePolicy(_) => ErrorCategory::Validation,
            Self::RegistryPatch { .. } => ErrorCategory::Conflict,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Conflict,
}
