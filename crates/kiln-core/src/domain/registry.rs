//! Route registry patching.
//!
//! The registry is a plain text file (by default `src/routes.tsx`) holding
//! import lines and one exported array literal of route objects. Patching is
//! textual and anchor based:
//!
//! 1. No document (or a blank one): a fresh document is synthesized.
//! 2. The entry's route path already appears as a quoted literal: no-op.
//! 3. Otherwise the import goes after the last import from the page
//!    namespace (falling back to the first import of any kind) and the
//!    route block goes right after the opening `[` of the exported array.
//!    An import that already binds the page from the same module is kept
//!    and only the route block is added.
//!
//! The exported array anchor is the *first* `export const|let|var x = [` or
//! `export default [` in the file. A registry that exports another array
//! (say `nav`) above the routes gets the route in that array; keep the
//! routes array first.
//!
//! Inserted lines follow the document's line endings (`\r\n` when it has
//! any). Both anchors are located before anything is modified. A missing
//! anchor is an error; the document is never overwritten blindly.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::domain::{
    error::{DomainError, RegistryAnchor},
    identifiers::DerivedIdentifiers,
    value_objects::ArtifactKind,
};

pub const DEFAULT_IMPORT_NAMESPACE: &str = "@/pages/";
pub const DEFAULT_REGISTRY_PATH: &str = "src/routes.tsx";

static IMPORT_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s*import(?:\s|\{|\*|'|")"#).expect("valid regex"));

static MODULE_SPECIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:\bfrom\s*|^\s*import\s*)['"]([^'"]+)['"]"#).expect("valid regex")
});

static ENTRIES_ARRAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^[ \t]*export\s+(?:(?:const|let|var)\s+[A-Za-z_$][\w$]*\s*(?::\s*[^=\n]+?)?\s*=\s*|default\s+)\[",
    )
    .expect("valid regex")
});

/// Conventions of the registry document being patched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryConvention {
    /// Module prefix generated pages are imported from.
    pub import_namespace: String,
}

impl Default for RegistryConvention {
    fn default() -> Self {
        Self {
            import_namespace: DEFAULT_IMPORT_NAMESPACE.to_string(),
        }
    }
}

impl RegistryConvention {
    pub fn new(import_namespace: impl Into<String>) -> Self {
        Self {
            import_namespace: import_namespace.into(),
        }
    }

    fn is_namespace_module(&self, module: &str) -> bool {
        module.starts_with(&self.import_namespace)
    }
}

/// What gets merged into the registry for one artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryEntry {
    pub import_statement: String,
    /// Module the page is imported from (`@/pages/InvoicePage`).
    pub import_module: String,
    /// Name the import binds (`InvoicePage`).
    pub import_binding: String,
    /// Indented route object, one line per property, no trailing newline.
    pub registration_block: String,
    /// Route path; the entry counts as registered when it appears quoted.
    pub uniqueness_key: String,
}

/// The registry entry for an artifact, or `None` for kinds without routes.
pub fn registry_entry(
    kind: ArtifactKind,
    ids: &DerivedIdentifiers,
    convention: &RegistryConvention,
) -> Option<RegistryEntry> {
    if !kind.is_routable() {
        return None;
    }

    let pascal = &ids.pascal_name;
    let path = format!("/{}", ids.kebab_name);
    let module = format!("{}{pascal}", convention.import_namespace);

    Some(RegistryEntry {
        import_statement: format!("import {{ {pascal} }} from '{module}';"),
        import_module: module,
        import_binding: pascal.clone(),
        registration_block: [
            "  {".to_string(),
            format!("    path: '{path}',"),
            format!("    element: <{pascal} />,"),
            format!("    title: '{}',", ids.title_text),
            "  },".to_string(),
        ]
        .join("\n"),
        uniqueness_key: path,
    })
}

/// Result of merging an entry into a registry document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// No usable document existed; this is the new one.
    Created(String),
    /// The existing document with the entry merged in.
    Patched(String),
    AlreadyExists,
}

impl PatchOutcome {
    pub fn document(&self) -> Option<&str> {
        match self {
            Self::Created(doc) | Self::Patched(doc) => Some(doc),
            Self::AlreadyExists => None,
        }
    }
}

/// Merge `entry` into `existing`.
///
/// Applying the same entry to the resulting document again yields
/// [`PatchOutcome::AlreadyExists`].
///
/// # Errors
///
/// [`DomainError::RegistryPatch`] when a non-blank document lacks an import
/// line or an exported array literal.
pub fn patch(existing: Option<&str>, entry: &RegistryEntry) -> Result<PatchOutcome, DomainError> {
    patch_with(existing, entry, &RegistryConvention::default())
}

/// [`patch`] with an explicit import namespace.
pub fn patch_with(
    existing: Option<&str>,
    entry: &RegistryEntry,
    convention: &RegistryConvention,
) -> Result<PatchOutcome, DomainError> {
    let document = match existing {
        Some(text) if !text.trim().is_empty() => text,
        _ => return Ok(PatchOutcome::Created(synthesize(entry))),
    };

    if is_registered(document, &entry.uniqueness_key) {
        return Ok(PatchOutcome::AlreadyExists);
    }

    let statements = import_statements(document);
    let import_at = if has_import(document, &statements, entry) {
        None
    } else {
        let at = import_insertion_point(&statements, convention).ok_or(
            DomainError::RegistryPatch {
                anchor: RegistryAnchor::Imports,
            },
        )?;
        Some(at)
    };
    let array = ENTRIES_ARRAY
        .find(document)
        .ok_or(DomainError::RegistryPatch {
            anchor: RegistryAnchor::EntriesArray,
        })?;

    let newline = line_ending(document);
    let block = entry.registration_block.replace('\n', newline);
    let block_text = block_insertion(document, array.end(), &block, newline);
    let mut inserts = vec![(array.end(), block_text)];
    if let Some(at) = import_at {
        inserts.push((at, format!("{newline}{}", entry.import_statement)));
    }
    // Apply back to front so earlier offsets stay valid.
    inserts.sort_by(|a, b| b.0.cmp(&a.0));

    let mut patched = document.to_string();
    for (at, text) in inserts {
        patched.insert_str(at, &text);
    }
    Ok(PatchOutcome::Patched(patched))
}

/// Whether `key` occurs as a single-, double- or backtick-quoted literal.
pub fn is_registered(document: &str, key: &str) -> bool {
    ['\'', '"', '`']
        .iter()
        .any(|q| document.contains(&format!("{q}{key}{q}")))
}

fn synthesize(entry: &RegistryEntry) -> String {
    format!(
        "{}\n\nexport const routes = [\n{}\n];\n",
        entry.import_statement, entry.registration_block
    )
}

fn line_ending(document: &str) -> &'static str {
    if document.contains("\r\n") { "\r\n" } else { "\n" }
}

/// One import statement, possibly spanning several lines.
struct ImportStatement<'a> {
    start: usize,
    /// Byte offset of the end of the statement's last line (before `\n`).
    end: usize,
    module: Option<&'a str>,
}

fn import_statements(document: &str) -> Vec<ImportStatement<'_>> {
    let mut lines = Vec::new();
    let mut offset = 0;
    for line in document.split_inclusive('\n') {
        let body = line.trim_end_matches(['\n', '\r']);
        lines.push((offset, body));
        offset += line.len();
    }

    let mut statements = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let (_, body) = lines[i];
        if !IMPORT_START.is_match(body) {
            i += 1;
            continue;
        }

        // Extend to the line naming the module; a statement that never
        // names one is treated as a single line.
        let mut last = i;
        let mut module = None;
        for (j, (_, candidate)) in lines.iter().enumerate().skip(i) {
            if j > i && IMPORT_START.is_match(candidate) {
                break;
            }
            if let Some(caps) = MODULE_SPECIFIER.captures(candidate) {
                last = j;
                module = caps.get(1).map(|m| m.as_str());
                break;
            }
        }
        if module.is_none() {
            last = i;
        }

        let (last_start, last_body) = lines[last];
        statements.push(ImportStatement {
            start: lines[i].0,
            end: last_start + last_body.len(),
            module,
        });
        i = last + 1;
    }
    statements
}

/// Whether some import from the entry's module already binds its name.
fn has_import(document: &str, statements: &[ImportStatement<'_>], entry: &RegistryEntry) -> bool {
    statements
        .iter()
        .filter(|s| s.module == Some(entry.import_module.as_str()))
        .any(|s| {
            // Bindings come before the module string.
            let text = &document[s.start..s.end];
            let bindings = text.split(['\'', '"']).next().unwrap_or_default();
            bindings
                .split(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'))
                .any(|word| word == entry.import_binding)
        })
}

fn import_insertion_point(
    statements: &[ImportStatement<'_>],
    convention: &RegistryConvention,
) -> Option<usize> {
    statements
        .iter()
        .rev()
        .find(|s| s.module.is_some_and(|m| convention.is_namespace_module(m)))
        .or_else(|| statements.first())
        .map(|s| s.end)
}

fn block_insertion(document: &str, open_end: usize, block: &str, newline: &str) -> String {
    let rest = &document[open_end..];
    let on_own_line = if rest.trim_start().starts_with(']') {
        // `[]` or `[\n]`: keep the closer on a fresh line.
        let gap = rest.len() - rest.trim_start().len();
        rest[..gap].contains('\n')
    } else {
        rest.split('\n').next().unwrap_or_default().trim().is_empty()
    };

    if on_own_line {
        format!("{newline}{block}")
    } else {
        format!("{newline}{block}{newline}")
    }
}
