//! Directory-backed template overrides.
//!
//! A project can override any built-in template by placing a file at
//! `<root>/<kind>/<name>.hbs`, e.g. `.kiln/templates/page/page.hbs`. Keys
//! without an override fall back to [`BuiltinStore`].

use std::{
    fs,
    path::{Path, PathBuf},
};

use kiln_core::{
    application::{
        ApplicationError,
        ports::{TemplateListing, TemplateOrigin, TemplateStore},
    },
    domain::{TemplateKey, all_template_keys},
    error::KilnResult,
};
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use super::BuiltinStore;

#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
    fallback: BuiltinStore,
}

impl DirectoryStore {
    /// The directory does not need to exist; a missing root serves built-ins only.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            fallback: BuiltinStore::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn override_path(&self, key: &TemplateKey) -> PathBuf {
        self.root.join(key.file_name())
    }

    /// `.hbs` files under the root that match no known template key.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn unrecognized(&self) -> KilnResult<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let known: Vec<PathBuf> = all_template_keys()
            .iter()
            .map(|key| self.override_path(key))
            .collect();

        let mut stray = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(&self.root).to_path_buf();
                ApplicationError::filesystem(path, e)
            })?;
            let path = entry.path();
            let is_template = entry.file_type().is_file()
                && path.extension().is_some_and(|ext| ext == "hbs");
            if is_template && !known.iter().any(|k| k == path) {
                warn!(path = %path.display(), "Ignoring template with unknown key");
                stray.push(path.to_path_buf());
            }
        }
        Ok(stray)
    }
}

impl TemplateStore for DirectoryStore {
    #[instrument(skip(self), fields(key = %key))]
    fn get(&self, key: &TemplateKey) -> KilnResult<String> {
        let path = self.override_path(key);
        if path.is_file() {
            debug!(path = %path.display(), "Using template override");
            return fs::read_to_string(&path)
                .map_err(|e| ApplicationError::filesystem(&path, e).into());
        }
        self.fallback.get(key)
    }

    fn list(&self) -> KilnResult<Vec<TemplateListing>> {
        Ok(all_template_keys()
            .into_iter()
            .map(|key| {
                let path = self.override_path(&key);
                let origin = if path.is_file() {
                    TemplateOrigin::Custom(path)
                } else {
                    TemplateOrigin::Builtin
                };
                TemplateListing { key, origin }
            })
            .collect())
    }
}
