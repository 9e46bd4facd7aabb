//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `kiln-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::{TemplateContext, TemplateError, TemplateKey};
use crate::error::KilnResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `kiln_adapters::filesystem::LocalFilesystem` (production)
/// - `kiln_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> KilnResult<()>;

    /// Write content to a file, replacing it if present.
    fn write_file(&self, path: &Path, content: &str) -> KilnResult<()>;

    /// Write content so readers see either the old or the new file, never a
    /// partial one.
    fn write_file_atomic(&self, path: &Path, content: &str) -> KilnResult<()>;

    /// Read a UTF-8 file. `Ok(None)` when it does not exist.
    fn read_to_string(&self, path: &Path) -> KilnResult<Option<String>>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Where a template source comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "origin", content = "path")]
pub enum TemplateOrigin {
    Builtin,
    Custom(PathBuf),
}

/// One entry of [`TemplateStore::list`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateListing {
    pub key: TemplateKey,
    #[serde(flatten)]
    pub origin: TemplateOrigin,
}

/// Port for template source lookup.
///
/// Implemented by:
/// - `kiln_adapters::template_store::BuiltinStore` (compiled-in templates)
/// - `kiln_adapters::template_store::DirectoryStore` (user overrides)
/// - `kiln_adapters::template_store::InMemoryStore` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait TemplateStore: Send + Sync {
    /// Template source for `key`.
    fn get(&self, key: &TemplateKey) -> KilnResult<String>;

    /// Every template the store can serve.
    fn list(&self) -> KilnResult<Vec<TemplateListing>>;
}

/// Port for template rendering.
///
/// Implemented by:
/// - `kiln_adapters::renderer::BlockRenderer`
#[cfg_attr(test, mockall::automock)]
pub trait TemplateRenderer: Send + Sync {
    /// Render `source` against `context`.
    fn render(&self, source: &str, context: &TemplateContext) -> Result<String, TemplateError>;
}

/// Port for the external code formatter.
///
/// Implemented by:
/// - `kiln_adapters::formatter::CommandFormatter` (e.g. prettier)
/// - `kiln_adapters::formatter::NoopFormatter`
#[cfg_attr(test, mockall::automock)]
pub trait CodeFormatter: Send + Sync {
    /// Format the files at `paths` in place.
    fn format(&self, paths: &[PathBuf]) -> KilnResult<()>;
}
