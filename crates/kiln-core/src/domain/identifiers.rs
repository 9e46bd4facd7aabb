//! Identifier derivation.
//!
//! Turns the human-supplied base name into every identifier a generation run
//! needs. All functions are pure and deterministic.
//!
//! | Field | `derive("UserPage", Page)` | `derive("orderItem", Component)` |
//! |-------|----------------------------|----------------------------------|
//! | `entity_name` | `User` | `OrderItem` |
//! | `pascal_name` | `UserPage` | `OrderItem` |
//! | `camel_name`  | `userPage` | `orderItem` |
//! | `kebab_name`  | `user` | `order-item` |
//! | `title_text`  | `User` | `Order Item` |
//!
//! # Known limitation
//!
//! Word boundaries are only detected at a lowercase→uppercase transition.
//! Runs of capitals are kept together: `HTTPClient` becomes `httpclient`.

use serde::Serialize;

use crate::domain::{error::DomainError, value_objects::ArtifactKind};

/// The family of identifiers derived from one base name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedIdentifiers {
    /// Pascal-case entity without the kind suffix (`Invoice`).
    pub entity_name: String,
    /// Pascal-case artifact name with the canonical suffix (`InvoicePage`).
    pub pascal_name: String,
    /// Instance name (`invoicePage`).
    pub camel_name: String,
    /// Slug used for routes and paths (`invoice`).
    pub kebab_name: String,
    /// Human-readable title (`Invoice`).
    pub title_text: String,
}

/// Derive all identifiers for `base_name` generated as `kind`.
///
/// `derive("User", Page)` and `derive("UserPage", Page)` are identical.
///
/// # Errors
///
/// [`DomainError::InvalidName`] when the name is empty, contains anything
/// outside `[A-Za-z0-9]`, or starts with a digit.
pub fn derive(base_name: &str, kind: ArtifactKind) -> Result<DerivedIdentifiers, DomainError> {
    validate_name(base_name)?;

    let pascal = upper_first(base_name);
    let suffix = kind.suffix();
    let entity = match pascal.strip_suffix(suffix) {
        Some(stripped) if !suffix.is_empty() && !stripped.is_empty() => stripped.to_string(),
        _ => pascal.clone(),
    };

    let pascal_name = format!("{entity}{suffix}");
    Ok(DerivedIdentifiers {
        camel_name: lower_first(&pascal_name),
        kebab_name: to_kebab_case(&entity),
        title_text: to_title_text(&entity),
        pascal_name,
        entity_name: entity,
    })
}

fn validate_name(name: &str) -> Result<(), DomainError> {
    let invalid = |reason: &str| DomainError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    let Some(first) = name.chars().next() else {
        return Err(invalid("name cannot be empty"));
    };
    if let Some(bad) = name.chars().find(|c| !c.is_ascii_alphanumeric()) {
        return Err(invalid(&format!(
            "character '{bad}' is not allowed (use A-Z, a-z, 0-9)"
        )));
    }
    if !first.is_ascii_alphabetic() {
        return Err(invalid("name must start with a letter"));
    }
    Ok(())
}

/// Hyphen at every lowercase→uppercase boundary, then lowercase everything.
pub fn to_kebab_case(s: &str) -> String {
    split_at_case_boundaries(s, '-').to_ascii_lowercase()
}

/// Space at every lowercase→uppercase boundary; case is preserved.
pub fn to_title_text(s: &str) -> String {
    split_at_case_boundaries(s, ' ')
}

pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

// Single pass; deliberately not iterative (see module docs).
fn split_at_case_boundaries(s: &str, separator: char) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    let mut prev: Option<char> = None;

    for c in s.chars() {
        if prev.is_some_and(|p| p.is_ascii_lowercase()) && c.is_ascii_uppercase() {
            out.push(separator);
        }
        out.push(c);
        prev = Some(c);
    }

    out
}
