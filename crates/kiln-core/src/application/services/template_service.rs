//! Template Service - template inspection operations.
//!
//! Backs `kiln list`: which templates exist, where each one comes from, and
//! what its source looks like. Separated from GenerateService for single
//! responsibility.

use crate::{
    application::ports::{TemplateListing, TemplateStore},
    domain::{ArtifactKind, TemplateKey, layout::all_template_keys, recognized_options},
    error::KilnResult,
};

/// Summary of one artifact kind for display.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct KindInfo {
    pub kind: ArtifactKind,
    pub suffix: &'static str,
    pub options: &'static [&'static str],
    pub templates: Vec<TemplateListing>,
    pub registers_route: bool,
}

/// Service for template operations.
pub struct TemplateService {
    store: Box<dyn TemplateStore>,
}

impl TemplateService {
    /// Create a new template service.
    pub fn new(store: Box<dyn TemplateStore>) -> Self {
        Self { store }
    }

    /// Source of one template.
    pub fn source(&self, key: &TemplateKey) -> KilnResult<String> {
        self.store.get(key)
    }

    /// List all templates.
    pub fn list(&self) -> KilnResult<Vec<TemplateListing>> {
        self.store.list()
    }

    /// Every kind with its options and templates, in declaration order.
    pub fn kinds(&self) -> KilnResult<Vec<KindInfo>> {
        let listings = self.store.list()?;
        Ok(ArtifactKind::ALL
            .into_iter()
            .map(|kind| KindInfo {
                kind,
                suffix: kind.suffix(),
                options: recognized_options(kind),
                templates: listings
                    .iter()
                    .filter(|l| l.key.kind == kind)
                    .cloned()
                    .collect(),
                registers_route: kind.is_routable(),
            })
            .collect())
    }

    /// Keys the layouts reference but the store cannot serve.
    pub fn missing(&self) -> KilnResult<Vec<TemplateKey>> {
        let listings = self.store.list()?;
        Ok(all_template_keys()
            .into_iter()
            .filter(|key| !listings.iter().any(|l| l.key == *key))
            .collect())
    }
}
