use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::{
    error::DomainError,
    value_objects::{ArtifactKind, OptionValue},
};

/// A fully resolved generation request, as handed over by the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub base_name: String,
    pub kind: ArtifactKind,
    pub options: GenerationOptions,
    pub output_root: PathBuf,
}

impl GenerationRequest {
    pub fn new(
        base_name: impl Into<String>,
        kind: ArtifactKind,
        output_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            base_name: base_name.into(),
            kind,
            options: GenerationOptions::default(),
            output_root: output_root.into(),
        }
    }

    /// Set an option, consuming self (builder style).
    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.options.set(name, value);
        self
    }
}

/// Option name → value. Sorted so iteration (and error reporting) is stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenerationOptions(BTreeMap<String, OptionValue>);

impl GenerationOptions {
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<OptionValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Boolean flag; absent means `false`.
    pub fn flag(&self, name: &str) -> Result<bool, DomainError> {
        match self.0.get(name) {
            None => Ok(false),
            Some(OptionValue::Flag(value)) => Ok(*value),
            Some(OptionValue::Text(_)) => Err(DomainError::InvalidOptionValue {
                option: name.to_string(),
                expected: "boolean",
            }),
        }
    }

    pub fn text(&self, name: &str) -> Result<Option<&str>, DomainError> {
        match self.0.get(name) {
            None => Ok(None),
            Some(OptionValue::Text(value)) => Ok(Some(value.as_str())),
            Some(OptionValue::Flag(_)) => Err(DomainError::InvalidOptionValue {
                option: name.to_string(),
                expected: "string",
            }),
        }
    }

    /// Reject options the kind does not recognize.
    pub fn validate_for(&self, kind: ArtifactKind) -> Result<(), DomainError> {
        let accepted = recognized_options(kind);
        match self.names().find(|name| !accepted.contains(name)) {
            Some(unknown) => Err(DomainError::UnsupportedOption {
                kind: kind.to_string(),
                option: unknown.to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// Options recognized by each artifact kind.
pub fn recognized_options(kind: ArtifactKind) -> &'static [&'static str] {
    match kind {
        ArtifactKind::Component => &["description", "antd", "styled"],
        ArtifactKind::Store => &["description", "api"],
        ArtifactKind::Service => &["description", "zod"],
        ArtifactKind::Page => &["description", "store", "service"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_flag_defaults_to_false() {
        let opts = GenerationOptions::default();
        assert!(!opts.flag("store").unwrap());
        assert_eq!(opts.text("description").unwrap(), None);
    }

    #[test]
    fn wrong_value_type_is_rejected() {
        let mut opts = GenerationOptions::default();
        opts.set("store", "yes");
        opts.set("description", true);
        assert!(matches!(
            opts.flag("store"),
            Err(DomainError::InvalidOptionValue { expected: "boolean", .. })
        ));
        assert!(matches!(
            opts.text("description"),
            Err(DomainError::InvalidOptionValue { expected: "string", .. })
        ));
    }

    #[test]
    fn unknown_option_for_kind_is_rejected() {
        let request = GenerationRequest::new("Invoice", ArtifactKind::Component, ".")
            .with_option("zod", true);
        let err = request.options.validate_for(request.kind).unwrap_err();
        assert_eq!(
            err,
            DomainError::UnsupportedOption {
                kind: "component".into(),
                option: "zod".into()
            }
        );
    }

    #[test]
    fn description_is_accepted_by_every_kind() {
        for kind in ArtifactKind::ALL {
            let mut opts = GenerationOptions::default();
            opts.set("description", "x");
            assert!(opts.validate_for(kind).is_ok(), "{kind}");
        }
    }
}
