//! Templates compiled into the binary.

use kiln_core::{
    application::{
        ApplicationError,
        ports::{TemplateListing, TemplateOrigin, TemplateStore},
    },
    domain::{ArtifactKind, TemplateKey},
    error::KilnResult,
};

/// Sources in layout order, paths relative to this file.
const TEMPLATES: &[(TemplateKey, &str)] = &[
    (
        TemplateKey::new(ArtifactKind::Component, "component"),
        include_str!("../../templates/component/component.hbs"),
    ),
    (
        TemplateKey::new(ArtifactKind::Component, "test"),
        include_str!("../../templates/component/test.hbs"),
    ),
    (
        TemplateKey::new(ArtifactKind::Component, "index"),
        include_str!("../../templates/component/index.hbs"),
    ),
    (
        TemplateKey::new(ArtifactKind::Store, "store"),
        include_str!("../../templates/store/store.hbs"),
    ),
    (
        TemplateKey::new(ArtifactKind::Store, "test"),
        include_str!("../../templates/store/test.hbs"),
    ),
    (
        TemplateKey::new(ArtifactKind::Store, "api-client"),
        include_str!("../../templates/store/api-client.hbs"),
    ),
    (
        TemplateKey::new(ArtifactKind::Service, "service"),
        include_str!("../../templates/service/service.hbs"),
    ),
    (
        TemplateKey::new(ArtifactKind::Service, "test"),
        include_str!("../../templates/service/test.hbs"),
    ),
    (
        TemplateKey::new(ArtifactKind::Page, "page"),
        include_str!("../../templates/page/page.hbs"),
    ),
    (
        TemplateKey::new(ArtifactKind::Page, "test"),
        include_str!("../../templates/page/test.hbs"),
    ),
    (
        TemplateKey::new(ArtifactKind::Page, "index"),
        include_str!("../../templates/page/index.hbs"),
    ),
];

/// Read-only store over the compiled-in templates.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinStore;

impl BuiltinStore {
    pub fn new() -> Self {
        Self
    }

    /// Built-in source for `key`, if any.
    pub fn source(&self, key: &TemplateKey) -> Option<&'static str> {
        TEMPLATES
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, source)| *source)
    }

    pub fn keys(&self) -> impl Iterator<Item = TemplateKey> {
        TEMPLATES.iter().map(|(key, _)| *key)
    }
}

impl TemplateStore for BuiltinStore {
    fn get(&self, key: &TemplateKey) -> KilnResult<String> {
        self.source(key).map(str::to_string).ok_or_else(|| {
            ApplicationError::TemplateNotFound {
                key: key.to_string(),
            }
            .into()
        })
    }

    fn list(&self) -> KilnResult<Vec<TemplateListing>> {
        Ok(self
            .keys()
            .map(|key| TemplateListing {
                key,
                origin: TemplateOrigin::Builtin,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use kiln_core::domain::all_template_keys;

    use super::*;

    #[test]
    fn every_layout_key_has_a_builtin() {
        let store = BuiltinStore::new();
        for key in all_template_keys() {
            let source = store.get(&key).unwrap();
            assert!(!source.trim().is_empty(), "{key} is empty");
        }
        assert_eq!(store.list().unwrap().len(), all_template_keys().len());
    }

    #[test]
    fn unknown_key_is_not_found() {
        let err = BuiltinStore::new()
            .get(&TemplateKey::new(ArtifactKind::Service, "index"))
            .unwrap_err();
        assert!(err.to_string().contains("service/index"));
    }
}
