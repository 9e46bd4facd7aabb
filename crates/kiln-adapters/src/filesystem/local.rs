//! Local filesystem adapter using std::fs.

use std::io::{self, Write};
use std::path::Path;

use kiln_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{KilnError, KilnResult},
};
use tempfile::NamedTempFile;
use tracing::{debug, instrument};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> KilnResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> KilnResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    /// Temp file in the target's directory, synced, then renamed over the
    /// target. Same directory keeps the rename on one filesystem.
    #[instrument(skip(self, content), fields(path = %path.display()))]
    fn write_file_atomic(&self, path: &Path, content: &str) -> KilnResult<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp =
            NamedTempFile::new_in(dir).map_err(|e| map_io_error(path, e, "create temp file"))?;
        temp.write_all(content.as_bytes())
            .map_err(|e| map_io_error(path, e, "write temp file"))?;
        temp.as_file()
            .sync_all()
            .map_err(|e| map_io_error(path, e, "sync temp file"))?;
        temp.persist(path)
            .map_err(|e| map_io_error(path, e.error, "replace file"))?;

        debug!("Atomic write complete");
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> KilnResult<Option<String>> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(map_io_error(path, e, "read file")),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> KilnError {
    ApplicationError::filesystem(path, format!("Failed to {}: {}", operation, e)).into()
}
