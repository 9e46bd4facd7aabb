//! Artifact layout: which files a kind produces and from which templates.
//!
//! The layout is a static table per kind. Paths are relative to the output
//! root and use `{P}` (pascal name) and `{e}` (entity in camel case)
//! placeholders that are expanded by [`layout`].

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::domain::{
    identifiers::{DerivedIdentifiers, lower_first},
    value_objects::ArtifactKind,
};

/// Identifies one template: `<kind>/<name>`, e.g. `page/test`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TemplateKey {
    pub kind: ArtifactKind,
    pub name: &'static str,
}

impl TemplateKey {
    pub const fn new(kind: ArtifactKind, name: &'static str) -> Self {
        Self { kind, name }
    }

    /// Relative file name under a template root (`page/test.hbs`).
    pub fn file_name(&self) -> PathBuf {
        PathBuf::from(self.kind.as_str()).join(format!("{}.hbs", self.name))
    }
}

impl fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.name)
    }
}

/// Static row of a layout table.
struct LayoutRow {
    path: &'static str,
    template: &'static str,
}

const fn row(path: &'static str, template: &'static str) -> LayoutRow {
    LayoutRow { path, template }
}

const COMPONENT: &[LayoutRow] = &[
    row("src/components/{P}/{P}.tsx", "component"),
    row("src/components/{P}/{P}.test.tsx", "test"),
    row("src/components/{P}/index.ts", "index"),
];

const STORE: &[LayoutRow] = &[
    row("src/stores/{P}.ts", "store"),
    row("src/stores/{P}.test.ts", "test"),
    // Always emitted; `hasApi` only decides whether the store calls it.
    row("src/api/{e}Api.ts", "api-client"),
];

const SERVICE: &[LayoutRow] = &[
    row("src/services/{P}.ts", "service"),
    row("src/services/{P}.test.ts", "test"),
];

const PAGE: &[LayoutRow] = &[
    row("src/pages/{P}/{P}.tsx", "page"),
    row("src/pages/{P}/{P}.test.tsx", "test"),
    row("src/pages/{P}/index.ts", "index"),
];

fn table(kind: ArtifactKind) -> &'static [LayoutRow] {
    match kind {
        ArtifactKind::Component => COMPONENT,
        ArtifactKind::Store => STORE,
        ArtifactKind::Service => SERVICE,
        ArtifactKind::Page => PAGE,
    }
}

/// One planned output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactSpec {
    pub relative_path: PathBuf,
    pub template: TemplateKey,
}

/// Ordered output files for `kind`. Main source first, then test, then extras.
pub fn layout(kind: ArtifactKind, ids: &DerivedIdentifiers) -> Vec<ArtifactSpec> {
    let entity_camel = lower_first(&ids.entity_name);
    table(kind)
        .iter()
        .map(|row| ArtifactSpec {
            relative_path: PathBuf::from(
                row.path
                    .replace("{P}", &ids.pascal_name)
                    .replace("{e}", &entity_camel),
            ),
            template: TemplateKey::new(kind, row.template),
        })
        .collect()
}

/// Every template key referenced by any layout.
pub fn all_template_keys() -> Vec<TemplateKey> {
    ArtifactKind::ALL
        .into_iter()
        .flat_map(|kind| {
            table(kind)
                .iter()
                .map(move |row| TemplateKey::new(kind, row.template))
        })
        .collect()
}

/// A rendered file, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedArtifact {
    pub relative_path: PathBuf,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::identifiers::derive;

    #[test]
    fn component_layout() {
        let ids = derive("orderItem", ArtifactKind::Component).unwrap();
        let paths: Vec<_> = layout(ArtifactKind::Component, &ids)
            .into_iter()
            .map(|a| a.relative_path)
            .collect();
        assert_eq!(
            paths,
            [
                PathBuf::from("src/components/OrderItem/OrderItem.tsx"),
                PathBuf::from("src/components/OrderItem/OrderItem.test.tsx"),
                PathBuf::from("src/components/OrderItem/index.ts"),
            ]
        );
    }

    #[test]
    fn store_always_includes_api_client() {
        let ids = derive("Invoice", ArtifactKind::Store).unwrap();
        let specs = layout(ArtifactKind::Store, &ids);
        let templates: Vec<_> = specs.iter().map(|s| s.template.name).collect();
        assert_eq!(templates, ["store", "test", "api-client"]);
        assert_eq!(
            specs[2].relative_path,
            PathBuf::from("src/api/invoiceApi.ts")
        );
    }

    #[test]
    fn template_keys_display_as_kind_slash_name() {
        let key = TemplateKey::new(ArtifactKind::Page, "test");
        assert_eq!(key.to_string(), "page/test");
        assert_eq!(key.file_name(), PathBuf::from("page").join("test.hbs"));
    }

    #[test]
    fn all_keys_cover_every_kind() {
        let keys = all_template_keys();
        assert_eq!(keys.len(), 11);
        for kind in ArtifactKind::ALL {
            assert!(keys.iter().any(|k| k.kind == kind));
        }
    }
}
