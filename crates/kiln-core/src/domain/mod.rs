// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Kiln.
//!
//! Pure generation logic: identifier derivation, template data composition,
//! artifact layout and registry patching. Nothing here touches the
//! filesystem; I/O goes through the ports in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or process calls
//! - **Deterministic**: Same request in, same text out
//! - **Immutable values**: Every domain object is Clone + PartialEq

pub mod composition;
pub mod context;
pub mod error;
pub mod identifiers;
pub mod layout;
pub mod registry;
pub mod request;
pub mod value_objects;

pub use composition::build_context;
pub use context::{ContextBuilder, Record, TemplateContext, Value};
pub use error::{DomainError, ErrorCategory, RegistryAnchor, TemplateError};
pub use identifiers::{DerivedIdentifiers, derive};
pub use layout::{ArtifactSpec, RenderedArtifact, TemplateKey, all_template_keys, layout};
pub use registry::{
    DEFAULT_IMPORT_NAMESPACE, DEFAULT_REGISTRY_PATH, PatchOutcome, RegistryConvention,
    RegistryEntry, patch, patch_with, registry_entry,
};
pub use request::{GenerationOptions, GenerationRequest, recognized_options};
pub use value_objects::{ArtifactKind, OptionValue, OverwritePolicy};

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    // ========================================================================
    // End-to-end domain flow (no I/O)
    // ========================================================================

    #[test]
    fn page_request_flows_through_every_stage() {
        let request = GenerationRequest::new("InvoicePage", ArtifactKind::Page, "/tmp/app")
            .with_option("store", true);
        request.options.validate_for(request.kind).unwrap();

        let ids = derive(&request.base_name, request.kind).unwrap();
        let ctx = build_context(&request, &ids).unwrap();
        assert_eq!(ctx.text("pascalName"), Some("InvoicePage"));

        let specs = layout(request.kind, &ids);
        assert_eq!(specs.len(), 3);
        assert_eq!(
            specs[0].relative_path,
            PathBuf::from("src/pages/InvoicePage/InvoicePage.tsx")
        );

        let entry = registry_entry(request.kind, &ids, &RegistryConvention::default()).unwrap();
        let first = patch(None, &entry).unwrap();
        let doc = first.document().unwrap();
        assert_eq!(patch(Some(doc), &entry).unwrap(), PatchOutcome::AlreadyExists);
    }

    #[test]
    fn kinds_parse_case_insensitively() {
        assert_eq!("Page".parse::<ArtifactKind>().unwrap(), ArtifactKind::Page);
        assert!(matches!(
            "widget".parse::<ArtifactKind>(),
            Err(DomainError::InvalidKind(_))
        ));
    }

    #[test]
    fn error_categories() {
        let err = derive("", ArtifactKind::Page).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert!(!err.suggestions().is_empty());

        let err = DomainError::RegistryPatch {
            anchor: RegistryAnchor::EntriesArray,
        };
        assert_eq!(err.category(), ErrorCategory::Conflict);
        assert!(err.to_string().contains("entries-array"));
    }
}
