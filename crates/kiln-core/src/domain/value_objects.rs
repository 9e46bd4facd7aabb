//! Domain value objects: ArtifactKind, OptionValue, OverwritePolicy.
//!
//! # Design
//!
//! These are pure value types with equality-by-value and no identity. Per-kind
//! behavior (recognized options, layouts, context rules) lives in the modules
//! that consume the kind; this file only defines the types, their string
//! representations, and their `FromStr` parsers.
//!
//! # Adding New Variants
//!
//! 1. Add the enum variant here
//! 2. Add the `as_str`, `suffix` and `FromStr` arms here
//! 3. Add a rule in `composition.rs` and a table in `layout.rs`

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── ArtifactKind ─────────────────────────────────────────────────────────────

/// The category of a generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Component,
    Store,
    Service,
    Page,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 4] = [Self::Component, Self::Store, Self::Service, Self::Page];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Component => "component",
            Self::Store => "store",
            Self::Service => "service",
            Self::Page => "page",
        }
    }

    /// Canonical pascal-case suffix appended to the entity name.
    ///
    /// Components carry no suffix: `OrderItem` is already the component name.
    pub const fn suffix(&self) -> &'static str {
        match self {
            Self::Component => "",
            Self::Store => "Store",
            Self::Service => "Service",
            Self::Page => "Page",
        }
    }

    /// Whether artifacts of this kind are registered in the route registry.
    pub const fn is_routable(&self) -> bool {
        matches!(self, Self::Page)
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "component" | "comp" => Ok(Self::Component),
            "store" => Ok(Self::Store),
            "service" | "svc" => Ok(Self::Service),
            "page" => Ok(Self::Page),
            other => Err(DomainError::InvalidKind(other.to_string())),
        }
    }
}

// ── OptionValue ───────────────────────────────────────────────────────────────

/// Value of a generation option: either a boolean flag or a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Flag(bool),
    Text(String),
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

// ── OverwritePolicy ───────────────────────────────────────────────────────────

/// What to do when an artifact file already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverwritePolicy {
    /// Replace the existing file (hand edits are lost).
    #[default]
    Always,
    /// Leave the existing file untouched and report it as skipped.
    Skip,
    /// Abort the run before anything is written.
    Error,
}

impl OverwritePolicy {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Skip => "skip",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for OverwritePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OverwritePolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "always" | "overwrite" => Ok(Self::Always),
            "skip" | "keep" => Ok(Self::Skip),
            "error" | "fail" => Ok(Self::Error),
            other => Err(DomainError::InvalidOverwritePolicy(other.to_string())),
        }
    }
}
